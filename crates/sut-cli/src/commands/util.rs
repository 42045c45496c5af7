//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Days, NaiveDate};
use regex::Regex;

/// Pre-compiled regex for relative day parsing.
static DAYS_AGO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+days?\s+ago$").unwrap());

/// Conservative bound for relative day parsing (~1000 years).
const MAX_DAYS_AGO: u64 = 1000 * 366;

/// Parse a report date relative to `today`.
///
/// Supports:
/// - ISO date: "2026-01-04"
/// - Keywords: "today", "yesterday"
/// - Relative: "3 days ago", "1 day ago"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return days_before(today, 1),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = DAYS_AGO_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-01-04), 'today', 'yesterday' or relative (e.g., '3 days ago')"
        );
    };

    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    if n > MAX_DAYS_AGO {
        anyhow::bail!("Relative date too far back: {n} days");
    }
    days_before(today, n)
}

/// Pick the report date from the command-line flags.
pub fn resolve_date(
    date: Option<&str>,
    yesterday: bool,
    today: NaiveDate,
) -> anyhow::Result<NaiveDate> {
    if yesterday {
        return days_before(today, 1);
    }
    date.map_or(Ok(today), |s| parse_date(s, today))
}

fn days_before(today: NaiveDate, n: u64) -> anyhow::Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(n))
        .with_context(|| format!("date out of range: {n} days before {today}"))
}
