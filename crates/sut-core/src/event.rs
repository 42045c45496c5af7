//! Log rows and their classification into timeline events.

use chrono::NaiveTime;

/// Process value marking the start of a work session.
pub const SESSION_START: &str = "SESSION_START";
/// Process value marking the start of a break.
pub const BREAK_START: &str = "BREAK_START";
/// Process value marking an explicit end of the session.
pub const SESSION_END: &str = "SESSION_END";
/// Prefix of the end-of-day summary row; its `end` column holds the total.
pub const TOTAL_MARKER_PREFIX: &str = "#TOTAL_ACTIVE_SEC";

const TIME_FORMAT: &str = "%H:%M:%S";

/// One row of a day log as it is stored on disk.
///
/// Absent columns are empty strings; classification decides what to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogRow {
    pub start: String,
    pub end: String,
    pub duration_sec: String,
    pub process: String,
    pub title: String,
}

/// What a row means to the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    SessionStart,
    BreakStart,
    SessionEnd,
    /// Override for the day's total active seconds.
    TotalMarker(i64),
    /// A process/window focus sample.
    Activity { duration_seconds: i64 },
    /// Empty process, or a marker/sample whose numeric column does not parse.
    Unrecognized,
}

impl EventKind {
    /// Classifies a row from its `process` field, reading the numeric column
    /// the kind needs. Surrounding whitespace must already be trimmed.
    pub fn classify(process: &str, end: &str, duration_sec: &str) -> Self {
        match process {
            "" => Self::Unrecognized,
            SESSION_START => Self::SessionStart,
            BREAK_START => Self::BreakStart,
            SESSION_END => Self::SessionEnd,
            p if p.starts_with(TOTAL_MARKER_PREFIX) => {
                parse_seconds(end).map_or(Self::Unrecognized, Self::TotalMarker)
            }
            _ => parse_seconds(duration_sec).map_or(Self::Unrecognized, |duration_seconds| {
                Self::Activity { duration_seconds }
            }),
        }
    }

    pub const fn is_session_start(self) -> bool {
        matches!(self, Self::SessionStart)
    }
}

/// A classified row, consumed by the state machine and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub time_of_day: NaiveTime,
    pub process_name: String,
    pub window_title: String,
    pub kind: EventKind,
}

impl RawEvent {
    /// Builds an event from a row.
    ///
    /// Returns `None` when the `start` column is missing or is not a valid
    /// `HH:MM:SS` time; such rows carry no position on the timeline.
    pub fn from_row(row: &LogRow) -> Option<Self> {
        let start = row.start.trim();
        if start.is_empty() {
            return None;
        }
        let time_of_day = NaiveTime::parse_from_str(start, TIME_FORMAT).ok()?;
        let process_name = row.process.trim().to_string();
        let kind = EventKind::classify(&process_name, row.end.trim(), row.duration_sec.trim());

        Some(Self {
            time_of_day,
            process_name,
            window_title: row.title.trim().to_string(),
            kind,
        })
    }
}

/// Parses an integer seconds column. A blank column reads as zero.
fn parse_seconds(value: &str) -> Option<i64> {
    if value.is_empty() {
        return Some(0);
    }
    value.parse().ok()
}
