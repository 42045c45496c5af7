//! Per-application and per-window active time.

use std::collections::HashMap;

const EXECUTABLE_SUFFIX: &str = ".exe";

/// Running totals for one application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppTally {
    pub total_seconds: i64,
    /// Seconds per non-empty window title.
    pub windows: HashMap<String, i64>,
}

/// Accumulates activity samples by application during a scan.
#[derive(Debug, Clone, Default)]
pub struct AppUsageAggregator {
    apps: HashMap<String, AppTally>,
}

impl AppUsageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one activity sample. Non-positive durations are ignored and
    /// totals saturate at `i64::MAX`.
    pub fn record(&mut self, process: &str, window_title: &str, duration_seconds: i64) {
        if duration_seconds <= 0 {
            return;
        }

        let tally = self
            .apps
            .entry(normalize_app_name(process).to_string())
            .or_default();
        tally.total_seconds = tally.total_seconds.saturating_add(duration_seconds);

        if !window_title.is_empty() {
            let window = tally.windows.entry(window_title.to_string()).or_insert(0);
            *window = window.saturating_add(duration_seconds);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Releases the accumulated tallies, in no particular order.
    pub fn into_tallies(self) -> HashMap<String, AppTally> {
        self.apps
    }
}

/// Strips a trailing executable suffix (`code.exe` → `code`), ignoring case.
pub fn normalize_app_name(process: &str) -> &str {
    let split = process.len().saturating_sub(EXECUTABLE_SUFFIX.len());
    match (process.get(..split), process.get(split..)) {
        (Some(stem), Some(suffix))
            if !stem.is_empty() && suffix.eq_ignore_ascii_case(EXECUTABLE_SUFFIX) =>
        {
            stem
        }
        _ => process,
    }
}
