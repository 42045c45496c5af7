//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Work/break reports from StandUp tracker activity logs.
///
/// Reconstructs a day's timeline of work sessions and breaks, and how the
/// time was spent across applications.
#[derive(Debug, Parser)]
#[command(name = "sut", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a work/break report for one day.
    Report {
        /// Day to report on: YYYY-MM-DD, "today", "yesterday" or "N days ago".
        #[arg(long, conflicts_with = "yesterday")]
        date: Option<String>,

        /// Report on yesterday.
        #[arg(long)]
        yesterday: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// Write the report to this file instead of stdout.
        #[arg(short, long, conflicts_with = "save")]
        output: Option<PathBuf>,

        /// Write the report to the reports directory.
        #[arg(long)]
        save: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_with_date() {
        let cli = Cli::try_parse_from(["sut", "report", "--date", "2026-01-04", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Report {
                date,
                yesterday,
                json,
                output,
                save,
            }) => {
                assert_eq!(date.as_deref(), Some("2026-01-04"));
                assert!(!yesterday);
                assert!(json);
                assert!(output.is_none());
                assert!(!save);
            }
            None => panic!("expected report command"),
        }
    }

    #[test]
    fn date_conflicts_with_yesterday() {
        let result = Cli::try_parse_from(["sut", "report", "--date", "today", "--yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn output_conflicts_with_save() {
        let result = Cli::try_parse_from(["sut", "report", "--output", "r.txt", "--save"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["sut", "report", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
