//! Day totals: active (work) time and break time.

use chrono::{NaiveDate, NaiveDateTime};

use crate::timeline::{Period, PeriodKind};

/// Tracks the activity span and any explicit total seen during a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationAggregator {
    total_marker: Option<i64>,
    first_activity: Option<NaiveDateTime>,
    last_activity: Option<NaiveDateTime>,
}

/// Final totals for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTotals {
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub total_work_seconds: i64,
    pub total_break_seconds: i64,
}

impl DurationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an explicit total. The most recent marker wins.
    pub fn record_total_marker(&mut self, total_seconds: i64) {
        self.total_marker = Some(total_seconds);
    }

    /// Extends the activity span to include `at`.
    pub fn record_activity(&mut self, at: NaiveDateTime) {
        if self.first_activity.is_none() {
            self.first_activity = Some(at);
        }
        self.last_activity = Some(at);
    }

    /// Timestamp of the most recent accepted event, if any.
    pub const fn last_activity(&self) -> Option<NaiveDateTime> {
        self.last_activity
    }

    /// Computes the day's totals from the closed periods.
    ///
    /// For a log dated `now`'s day, the end of the activity span is raised to
    /// `now` since the day is still in progress.
    pub fn finish(&self, periods: &[Period], date: NaiveDate, now: NaiveDateTime) -> DayTotals {
        let total_work_seconds = match self.total_marker {
            Some(total) if total != 0 => total,
            _ => work_seconds(periods),
        };

        let end_time = if now.date() == date {
            self.last_activity.map(|last| last.max(now))
        } else {
            self.last_activity
        };

        let total_break_seconds = match (self.first_activity, end_time) {
            (Some(first), Some(last)) => {
                (last - first)
                    .num_seconds()
                    .saturating_sub(total_work_seconds)
                    .max(0)
            }
            _ => 0,
        };

        DayTotals {
            start_time: self.first_activity,
            end_time,
            total_work_seconds,
            total_break_seconds,
        }
    }
}

/// Sum of Work period lengths in whole seconds.
pub fn work_seconds(periods: &[Period]) -> i64 {
    periods
        .iter()
        .filter(|period| period.kind == PeriodKind::Work)
        .map(Period::duration_seconds)
        .fold(0, i64::saturating_add)
}
