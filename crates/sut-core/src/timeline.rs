//! Session state machine: turns ordered log events into work/break periods.
//!
//! # Rules
//!
//! 1. Everything before the first `SESSION_START` is ignored. Those rows are
//!    the tail of the previous day that ran past midnight.
//! 2. At most one interval is open at a time. `SESSION_START` always opens a
//!    work interval, closing whatever was open. `BREAK_START` closes work and
//!    opens a break. `SESSION_END` closes work.
//! 3. An interval still open at end of input is closed at `now` when the log
//!    is for today, otherwise at the last accepted event.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::duration::{DayTotals, DurationAggregator};
use crate::event::{EventKind, RawEvent};
use crate::usage::AppUsageAggregator;

/// Classification of a closed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Work,
    Break,
}

impl PeriodKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
        }
    }
}

impl std::fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed, classified interval of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub kind: PeriodKind,
}

impl Period {
    /// Length in whole seconds. Never negative.
    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds().max(0)
    }
}

/// The currently open interval, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SessionState {
    #[default]
    Idle,
    Working {
        start: NaiveDateTime,
    },
    OnBreak {
        start: NaiveDateTime,
    },
}

impl SessionState {
    /// Closes the open interval at `end`, if there is one.
    const fn close(self, end: NaiveDateTime) -> Option<Period> {
        match self {
            Self::Idle => None,
            Self::Working { start } => Some(Period {
                start,
                end,
                kind: PeriodKind::Work,
            }),
            Self::OnBreak { start } => Some(Period {
                start,
                end,
                kind: PeriodKind::Break,
            }),
        }
    }
}

/// Everything a scan produced, ready for assembly into a report.
#[derive(Debug, Clone)]
pub struct DayScan {
    pub periods: Vec<Period>,
    pub totals: DayTotals,
    pub usage: AppUsageAggregator,
}

/// Single-pass reconciler for one day's events.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    date: NaiveDate,
    session_started: bool,
    state: SessionState,
    periods: Vec<Period>,
    durations: DurationAggregator,
    usage: AppUsageAggregator,
}

impl SessionMachine {
    /// Creates a machine for the log of `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            session_started: false,
            state: SessionState::Idle,
            periods: Vec::new(),
            durations: DurationAggregator::new(),
            usage: AppUsageAggregator::new(),
        }
    }

    /// Feeds the next event in file order.
    pub fn feed(&mut self, event: RawEvent) {
        if !self.session_started && !event.kind.is_session_start() {
            tracing::trace!(time = %event.time_of_day, process = %event.process_name, "skipping row before first session start");
            return;
        }

        let at = self.date.and_time(event.time_of_day);
        match event.kind {
            EventKind::SessionStart => {
                self.session_started = true;
                self.close_open(at);
                self.state = SessionState::Working { start: at };
                self.durations.record_activity(at);
            }
            EventKind::BreakStart => {
                match self.state {
                    SessionState::Working { .. } => self.close_open(at),
                    SessionState::OnBreak { start } => {
                        tracing::debug!(%start, restart = %at, "break restarted, earlier break dropped");
                    }
                    SessionState::Idle => {}
                }
                self.state = SessionState::OnBreak { start: at };
                self.durations.record_activity(at);
            }
            EventKind::SessionEnd => {
                if matches!(self.state, SessionState::Working { .. }) {
                    self.close_open(at);
                }
                self.state = SessionState::Idle;
                self.durations.record_activity(at);
            }
            EventKind::TotalMarker(total_seconds) => {
                self.durations.record_total_marker(total_seconds);
            }
            EventKind::Activity { duration_seconds } => {
                self.usage
                    .record(&event.process_name, &event.window_title, duration_seconds);
                self.durations.record_activity(at);
            }
            EventKind::Unrecognized => {
                tracing::trace!(time = %event.time_of_day, process = %event.process_name, "skipping unrecognized row");
            }
        }
    }

    /// Closes any open interval and computes the day's totals.
    ///
    /// `now` is only consulted when it falls on the log's date.
    pub fn finish(mut self, now: NaiveDateTime) -> DayScan {
        let end = if now.date() == self.date {
            Some(now)
        } else {
            self.durations.last_activity()
        };
        // Opening an interval always records activity.
        debug_assert!(
            end.is_some() || self.state == SessionState::Idle,
            "open interval without an accepted event"
        );
        if let Some(end) = end {
            self.close_open(end);
        }
        self.state = SessionState::Idle;

        let totals = self.durations.finish(&self.periods, self.date, now);
        DayScan {
            periods: self.periods,
            totals,
            usage: self.usage,
        }
    }

    fn close_open(&mut self, end: NaiveDateTime) {
        if let Some(period) = self.state.close(end) {
            self.periods.push(period);
        }
    }
}

/// Runs a full scan over `events` in order.
pub fn scan_day<I>(date: NaiveDate, events: I, now: NaiveDateTime) -> DayScan
where
    I: IntoIterator<Item = RawEvent>,
{
    let mut machine = SessionMachine::new(date);
    for event in events {
        machine.feed(event);
    }
    machine.finish(now)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 4).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, s).unwrap()
    }

    /// A wall clock well after the log's day.
    fn past_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn event(time: &str, kind: EventKind) -> RawEvent {
        RawEvent {
            time_of_day: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
            process_name: "app.exe".to_string(),
            window_title: String::new(),
            kind,
        }
    }

    fn activity(time: &str, seconds: i64) -> RawEvent {
        event(
            time,
            EventKind::Activity {
                duration_seconds: seconds,
            },
        )
    }

    fn work(start: NaiveDateTime, end: NaiveDateTime) -> Period {
        Period {
            start,
            end,
            kind: PeriodKind::Work,
        }
    }

    fn rest(start: NaiveDateTime, end: NaiveDateTime) -> Period {
        Period {
            start,
            end,
            kind: PeriodKind::Break,
        }
    }

    #[test]
    fn work_break_work_sequence() {
        let scan = scan_day(
            day(),
            [
                event("09:00:00", EventKind::SessionStart),
                event("10:00:00", EventKind::BreakStart),
                event("10:15:00", EventKind::SessionStart),
                event("17:00:00", EventKind::SessionEnd),
            ],
            past_now(),
        );

        assert_eq!(
            scan.periods,
            vec![
                work(at(9, 0, 0), at(10, 0, 0)),
                rest(at(10, 0, 0), at(10, 15, 0)),
                work(at(10, 15, 0), at(17, 0, 0)),
            ]
        );
    }

    #[test]
    fn rows_before_first_session_start_are_ignored() {
        let scan = scan_day(
            day(),
            [
                activity("23:58:00", 60),
                event("23:59:00", EventKind::BreakStart),
                event("23:59:30", EventKind::TotalMarker(999)),
                event("00:05:00", EventKind::SessionStart),
                activity("00:06:00", 30),
                event("01:00:00", EventKind::SessionEnd),
            ],
            past_now(),
        );

        assert_eq!(scan.totals.start_time, Some(at(0, 5, 0)));
        assert_eq!(scan.periods, vec![work(at(0, 5, 0), at(1, 0, 0))]);
        assert_eq!(scan.totals.total_work_seconds, 55 * 60);
        assert_eq!(scan.usage.into_tallies()["app"].total_seconds, 30);
    }

    #[test]
    fn repeated_session_start_closes_open_work() {
        let scan = scan_day(
            day(),
            [
                event("09:00:00", EventKind::SessionStart),
                event("11:00:00", EventKind::SessionStart),
                event("12:00:00", EventKind::SessionEnd),
            ],
            past_now(),
        );

        assert_eq!(
            scan.periods,
            vec![
                work(at(9, 0, 0), at(11, 0, 0)),
                work(at(11, 0, 0), at(12, 0, 0)),
            ]
        );
    }

    #[test]
    fn break_while_on_break_restarts_without_emitting() {
        let scan = scan_day(
            day(),
            [
                event("09:00:00", EventKind::SessionStart),
                event("10:00:00", EventKind::BreakStart),
                event("10:30:00", EventKind::BreakStart),
                event("11:00:00", EventKind::SessionStart),
                event("12:00:00", EventKind::SessionEnd),
            ],
            past_now(),
        );

        assert_eq!(
            scan.periods,
            vec![
                work(at(9, 0, 0), at(10, 0, 0)),
                rest(at(10, 30, 0), at(11, 0, 0)),
                work(at(11, 0, 0), at(12, 0, 0)),
            ]
        );
    }

    #[test]
    fn break_after_session_end_opens_break() {
        let scan = scan_day(
            day(),
            [
                event("09:00:00", EventKind::SessionStart),
                event("10:00:00", EventKind::SessionEnd),
                event("10:05:00", EventKind::BreakStart),
                event("10:20:00", EventKind::SessionStart),
                event("11:00:00", EventKind::SessionEnd),
            ],
            past_now(),
        );

        assert_eq!(
            scan.periods,
            vec![
                work(at(9, 0, 0), at(10, 0, 0)),
                rest(at(10, 5, 0), at(10, 20, 0)),
                work(at(10, 20, 0), at(11, 0, 0)),
            ]
        );
    }

    #[test]
    fn session_end_during_break_emits_nothing() {
        let scan = scan_day(
            day(),
            [
                event("09:00:00", EventKind::SessionStart),
                event("10:00:00", EventKind::BreakStart),
                event("10:30:00", EventKind::SessionEnd),
            ],
            past_now(),
        );

        assert_eq!(scan.periods, vec![work(at(9, 0, 0), at(10, 0, 0))]);
    }

    #[test]
    fn open_break_on_past_day_closes_at_last_event() {
        let scan = scan_day(
            day(),
            [
                event("09:00:00", EventKind::SessionStart),
                event("12:00:00", EventKind::BreakStart),
                activity("12:40:00", 0),
            ],
            past_now(),
        );

        assert_eq!(
            scan.periods,
            vec![
                work(at(9, 0, 0), at(12, 0, 0)),
                rest(at(12, 0, 0), at(12, 40, 0)),
            ]
        );
    }

    #[test]
    fn lone_session_start_on_past_day_closes_where_it_opened() {
        let scan = scan_day(day(), [event("09:00:00", EventKind::SessionStart)], past_now());

        assert_eq!(scan.periods, vec![work(at(9, 0, 0), at(9, 0, 0))]);
        assert_eq!(scan.totals.end_time, Some(at(9, 0, 0)));
        assert_eq!(scan.totals.total_work_seconds, 0);
    }

    #[test]
    fn open_work_today_closes_at_now() {
        let now = at(15, 30, 0);
        let scan = scan_day(
            day(),
            [
                event("09:00:00", EventKind::SessionStart),
                activity("09:30:00", 60),
            ],
            now,
        );

        assert_eq!(scan.periods, vec![work(at(9, 0, 0), now)]);
        assert_eq!(scan.totals.total_work_seconds, 6 * 3600 + 1800);
        assert_eq!(scan.totals.end_time, Some(now));
        assert_eq!(scan.totals.total_break_seconds, 0);
    }

    #[test]
    fn markers_do_not_move_activity_span() {
        let scan = scan_day(
            day(),
            [
                event("09:00:00", EventKind::SessionStart),
                event("10:00:00", EventKind::SessionEnd),
                event("23:00:00", EventKind::TotalMarker(3000)),
            ],
            past_now(),
        );

        assert_eq!(scan.totals.end_time, Some(at(10, 0, 0)));
        assert_eq!(scan.totals.total_work_seconds, 3000);
        assert_eq!(scan.totals.total_break_seconds, 600);
    }

    #[test]
    fn unrecognized_rows_change_nothing() {
        let scan = scan_day(
            day(),
            [
                event("09:00:00", EventKind::SessionStart),
                event("18:00:00", EventKind::Unrecognized),
                event("10:00:00", EventKind::SessionEnd),
            ],
            past_now(),
        );

        assert_eq!(scan.totals.end_time, Some(at(10, 0, 0)));
        assert_eq!(scan.periods, vec![work(at(9, 0, 0), at(10, 0, 0))]);
    }

    #[test]
    fn no_session_start_yields_empty_scan() {
        let scan = scan_day(
            day(),
            [activity("09:00:00", 60), event("10:00:00", EventKind::SessionEnd)],
            past_now(),
        );

        assert!(scan.periods.is_empty());
        assert!(scan.usage.is_empty());
        assert_eq!(scan.totals.start_time, None);
        assert_eq!(scan.totals.total_work_seconds, 0);
    }

    #[test]
    fn periods_are_ordered_and_disjoint() {
        let kinds = [
            EventKind::SessionStart,
            EventKind::BreakStart,
            EventKind::BreakStart,
            EventKind::SessionEnd,
            EventKind::SessionStart,
            EventKind::SessionEnd,
            EventKind::BreakStart,
            EventKind::SessionStart,
        ];
        // Every rotation of the marker sequence, one minute apart.
        for offset in 0..kinds.len() {
            let events = (0..kinds.len() * 3).map(|i| {
                let minute = u32::try_from(i).unwrap();
                RawEvent {
                    time_of_day: NaiveTime::from_hms_opt(8 + minute / 60, minute % 60, 0).unwrap(),
                    process_name: String::new(),
                    window_title: String::new(),
                    kind: kinds[(i + offset) % kinds.len()],
                }
            });
            let scan = scan_day(day(), events, past_now());

            for pair in scan.periods.windows(2) {
                assert!(pair[0].start <= pair[1].start, "offset {offset}: {pair:?}");
                assert!(pair[0].end <= pair[1].start, "offset {offset}: {pair:?}");
            }
            for period in &scan.periods {
                assert!(period.start <= period.end, "offset {offset}: {period:?}");
            }
        }
    }
}
