//! Report command for rendering a day's work/break report.
//!
//! This module implements `sut report` with date selection (--date,
//! --yesterday), output formats (human-readable, JSON) and destinations
//! (stdout, --output, --save).

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sut_core::{LogReader, Report, load_report};

use crate::Config;

/// Maximum windows listed under each application in the text report.
const MAX_WINDOWS_SHOWN: usize = 5;

/// Window titles longer than this are cut in the text report.
const MAX_TITLE_CHARS: usize = 24;

/// Where the rendered report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
    /// `<reports_dir>/report_<date>.<ext>`.
    ReportsDir,
}

/// Options for one report invocation.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub date: NaiveDate,
    pub json: bool,
    pub destination: Destination,
}

// ========== Formatting Helpers ==========

/// Formats seconds as `HH:MM:SS`. Hours are not wrapped at 24.
/// Negative durations are treated as zero.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

fn format_clock(time: Option<NaiveDateTime>) -> String {
    time.map_or_else(|| "N/A".to_string(), |t| t.format("%H:%M:%S").to_string())
}

/// Generates a 10-character progress bar for a 0–100 percentage.
/// Non-zero values below 5% get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(percentage: f64) -> String {
    let filled = if percentage > 0.0 && percentage < 5.0 {
        1
    } else {
        (percentage / 10.0).round().clamp(0.0, 10.0) as usize
    };
    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let mut cut: String = title.chars().take(MAX_TITLE_CHARS - 1).collect();
    cut.push('…');
    cut
}

// ========== Text Output ==========

/// Formats the human-readable report output.
pub fn format_report(report: &Report) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "WORK / BREAK REPORT: {}",
        report.date.format("%A, %b %-d, %Y")
    )
    .unwrap();

    if let Some(error) = &report.error {
        writeln!(output).unwrap();
        writeln!(output, "{error}").unwrap();
        return output;
    }

    writeln!(output).unwrap();
    writeln!(output, "Start:  {}", format_clock(report.start_time)).unwrap();
    writeln!(output, "End:    {}", format_clock(report.end_time)).unwrap();
    writeln!(output, "Work:   {}", format_duration(report.total_work_seconds)).unwrap();
    writeln!(output, "Break:  {}", format_duration(report.total_break_seconds)).unwrap();

    // TIMELINE section
    writeln!(output).unwrap();
    writeln!(output, "TIMELINE").unwrap();
    writeln!(output, "────────").unwrap();
    if report.periods.is_empty() {
        writeln!(output, "(no sessions recorded)").unwrap();
    }
    for period in &report.periods {
        writeln!(
            output,
            "{} - {}  {:<5}  {}",
            period.start.format("%H:%M:%S"),
            period.end.format("%H:%M:%S"),
            period.kind.as_str(),
            format_duration(period.duration_seconds())
        )
        .unwrap();
    }

    // APPLICATIONS section
    writeln!(output).unwrap();
    writeln!(output, "APPLICATIONS").unwrap();
    writeln!(output, "────────────").unwrap();
    if report.app_usage.is_empty() {
        writeln!(output, "(no application activity)").unwrap();
    }
    for app in &report.app_usage {
        writeln!(
            output,
            "{:<28}{:>9}  {:>5.1}%  {}",
            app.name,
            format_duration(app.total_seconds),
            app.percentage,
            progress_bar(app.percentage)
        )
        .unwrap();

        for window in app.windows.iter().take(MAX_WINDOWS_SHOWN) {
            writeln!(
                output,
                "    {:<24}{:>9}  {:>5.1}%",
                truncate_title(&window.title),
                format_duration(window.seconds),
                window.percentage
            )
            .unwrap();
        }
        let remaining = app.windows.len().saturating_sub(MAX_WINDOWS_SHOWN);
        if remaining > 0 {
            writeln!(output, "    ... and {remaining} more").unwrap();
        }
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: String,
    #[serde(flatten)]
    pub report: &'a Report,
}

/// Formats the report as JSON.
pub fn format_report_json(report: &Report, generated_at: NaiveDateTime) -> Result<String> {
    let json = JsonReport {
        generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        report,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Default file name under the reports directory.
pub fn default_output_path(config: &Config, date: NaiveDate, json: bool) -> PathBuf {
    let ext = if json { "json" } else { "txt" };
    config
        .reports_dir
        .join(format!("report_{}.{ext}", date.format("%Y-%m-%d")))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Runs the report command.
///
/// `now` is the current local time; it decides whether `options.date` is
/// still in progress. A missing log for the day is reported, but a missing
/// logs directory is an error.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    options: &ReportOptions,
    now: NaiveDateTime,
) -> Result<()> {
    if !config.logs_dir.is_dir() {
        bail!("Logs folder not found: {}", config.logs_dir.display());
    }

    let reader = LogReader::new(&config.logs_dir);
    let report = load_report(&reader, options.date, now)
        .with_context(|| format!("failed to load log for {}", options.date))?;

    if !report.exists {
        tracing::warn!(path = %reader.log_path(options.date).display(), "no log file for requested day");
    }

    let rendered = if options.json {
        let mut json = format_report_json(&report, now)?;
        json.push('\n');
        json
    } else {
        format_report(&report)
    };

    let path = match &options.destination {
        Destination::Stdout => {
            write!(writer, "{rendered}")?;
            return Ok(());
        }
        Destination::File(path) => path.clone(),
        Destination::ReportsDir => default_output_path(config, options.date, options.json),
    };

    write_file(&path, &rendered)?;
    writeln!(writer, "Report written: {}", path.display())?;
    if let Some(error) = &report.error {
        writeln!(writer, "Warning: {error}")?;
    } else {
        writeln!(writer, "  Work:  {}", format_duration(report.total_work_seconds))?;
        writeln!(writer, "  Break: {}", format_duration(report.total_break_seconds))?;
    }

    Ok(())
}
