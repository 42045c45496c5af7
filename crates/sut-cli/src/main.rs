use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sut_cli::commands::report::{self, Destination, ReportOptions};
use sut_cli::commands::util::resolve_date;
use sut_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so rendered reports on stdout stay clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Report {
            date,
            yesterday,
            json,
            output,
            save,
        }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");

            let now = Local::now().naive_local();
            let date = resolve_date(date.as_deref(), *yesterday, now.date())?;
            let destination = match output {
                Some(path) => Destination::File(path.clone()),
                None if *save => Destination::ReportsDir,
                None => Destination::Stdout,
            };
            let options = ReportOptions {
                date,
                json: *json,
                destination,
            };
            report::run(&mut std::io::stdout().lock(), &config, &options, now)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
