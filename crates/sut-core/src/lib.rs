//! Core domain logic for the StandUp tracker day report.
//!
//! This crate turns one day's activity log into a report:
//! - Reading: locating and parsing the per-day CSV log
//! - Timeline: reconciling session markers into work/break periods
//! - Aggregation: day totals and per-application usage
//! - Assembly: the immutable `Report` consumed by renderers

pub mod duration;
pub mod event;
pub mod reader;
pub mod report;
pub mod timeline;
pub mod usage;

pub use duration::{DayTotals, DurationAggregator};
pub use event::{EventKind, LogRow, RawEvent};
pub use reader::{LogError, LogReader};
pub use report::{AppUsage, Report, WindowUsage, build_report, load_report};
pub use timeline::{DayScan, Period, PeriodKind, SessionMachine, scan_day};
pub use usage::{AppUsageAggregator, normalize_app_name};
