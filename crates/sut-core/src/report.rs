//! Assembly of the immutable day report.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::event::{LogRow, RawEvent};
use crate::reader::{LogError, LogReader};
use crate::timeline::{DayScan, Period, scan_day};
use crate::usage::AppTally;

/// Time spent in one window of an application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowUsage {
    pub title: String,
    pub seconds: i64,
    /// Share of the owning application's total, 0–100.
    pub percentage: f64,
}

/// Time spent in one application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppUsage {
    pub name: String,
    pub total_seconds: i64,
    /// Share of all recorded application time, 0–100.
    pub percentage: f64,
    /// Sorted by seconds, longest first.
    pub windows: Vec<WindowUsage>,
}

/// A reconstructed day: timeline, totals and application usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub date: NaiveDate,
    /// Whether the day's log file was found.
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub total_work_seconds: i64,
    pub total_break_seconds: i64,
    pub periods: Vec<Period>,
    /// Sorted by total seconds, longest first.
    pub app_usage: Vec<AppUsage>,
}

impl Report {
    /// The report for a day without a log.
    pub fn missing(date: NaiveDate) -> Self {
        Self {
            date,
            exists: false,
            error: Some(format!("No log file found for {}", date.format("%Y-%m-%d"))),
            start_time: None,
            end_time: None,
            total_work_seconds: 0,
            total_break_seconds: 0,
            periods: Vec::new(),
            app_usage: Vec::new(),
        }
    }

    /// Combines a finished scan into a report.
    pub fn assemble(date: NaiveDate, scan: DayScan) -> Self {
        let DayScan {
            periods,
            totals,
            usage,
        } = scan;

        Self {
            date,
            exists: true,
            error: None,
            start_time: totals.start_time,
            end_time: totals.end_time,
            total_work_seconds: totals.total_work_seconds,
            total_break_seconds: totals.total_break_seconds,
            periods,
            app_usage: rank_apps(usage.into_tallies()),
        }
    }
}

/// Builds a report from the rows of one day's log.
///
/// `now` is the caller's current local time; it only matters when it falls
/// on `date`.
pub fn build_report(date: NaiveDate, rows: &[LogRow], now: NaiveDateTime) -> Report {
    let events = rows.iter().filter_map(RawEvent::from_row);
    let scan = scan_day(date, events, now);
    tracing::debug!(
        %date,
        rows = rows.len(),
        periods = scan.periods.len(),
        "scanned day log"
    );
    Report::assemble(date, scan)
}

/// Reads the log for `date` and builds its report.
///
/// A missing log yields a report with `exists == false`; other read
/// failures are returned.
pub fn load_report(
    reader: &LogReader,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<Report, LogError> {
    match reader.read_day(date) {
        Ok(rows) => Ok(build_report(date, &rows, now)),
        Err(err) if err.is_not_found() => {
            tracing::debug!(path = %reader.log_path(date).display(), "no log for day");
            Ok(Report::missing(date))
        }
        Err(err) => Err(err),
    }
}

/// Sorts applications and their windows by time and fills in percentages.
fn rank_apps(tallies: HashMap<String, AppTally>) -> Vec<AppUsage> {
    let grand_total = tallies
        .values()
        .map(|tally| tally.total_seconds)
        .fold(0, i64::saturating_add);

    let mut apps: Vec<AppUsage> = tallies
        .into_iter()
        .map(|(name, tally)| {
            let mut windows: Vec<WindowUsage> = tally
                .windows
                .into_iter()
                .map(|(title, seconds)| WindowUsage {
                    title,
                    seconds,
                    percentage: percentage(seconds, tally.total_seconds),
                })
                .collect();
            windows.sort_by(|a, b| {
                Reverse(a.seconds)
                    .cmp(&Reverse(b.seconds))
                    .then_with(|| a.title.cmp(&b.title))
            });

            AppUsage {
                percentage: percentage(tally.total_seconds, grand_total),
                name,
                total_seconds: tally.total_seconds,
                windows,
            }
        })
        .collect();

    apps.sort_by(|a, b| {
        Reverse(a.total_seconds)
            .cmp(&Reverse(b.total_seconds))
            .then_with(|| a.name.cmp(&b.name))
    });
    apps
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
