#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the basketball data scraper.

use clap::{Args, Parser, Subcommand};
use hoops_ingest::pipeline::{self, Pipeline};
use hoops_ingest::{IngestConfig, OutputOptions};

#[derive(Parser)]
#[command(
    name = "hoops_ingest",
    about = "Scrape basketball stats, salaries and contracts into CSV and Google Sheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape Basketball-Reference season totals and compute fantasy metrics
    Stats {
        /// Season end year (defaults to `HOOPS_CURRENT_SEASON`)
        #[arg(long)]
        year: Option<u16>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Scrape every team's Spotrac salary table
    Contracts {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Scrape how each active player's contract was signed (resumable)
    ContractTypes {
        /// Concurrent contract page fetches (defaults to `HOOPS_WORKERS`)
        #[arg(long)]
        workers: Option<usize>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Scrape player teams and positions from Sports.ws
    Positions {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Log when Basketball-Reference last updated its data
    SiteUpdated,
    /// List the configured sites
    Sites,
}

/// Output flags shared by the publishing commands.
#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct OutputArgs {
    /// Write the CSV output (default)
    #[arg(long, overrides_with = "no_update_csv")]
    update_csv: bool,
    /// Skip the CSV output
    #[arg(long, overrides_with = "update_csv")]
    no_update_csv: bool,
    /// Publish to Google Sheets
    #[arg(long, overrides_with = "no_update_sheets")]
    update_sheets: bool,
    /// Do not publish to Google Sheets (default)
    #[arg(long, overrides_with = "update_sheets")]
    no_update_sheets: bool,
    /// Sheet tab to publish to (overrides `SHEET_NAME`)
    #[arg(long)]
    sheet: Option<String>,
    /// A1 range to clear before publishing, e.g. "A:E"
    #[arg(long)]
    range: Option<String>,
}

impl From<OutputArgs> for OutputOptions {
    fn from(args: OutputArgs) -> Self {
        Self {
            update_csv: args.update_csv || !args.no_update_csv,
            update_sheets: args.update_sheets && !args.no_update_sheets,
            sheet: args.sheet,
            range: args.range,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = hoops_cli_utils::init_logger();
    let cli = Cli::parse();
    let mut config = IngestConfig::from_env()?;

    let Some(command) = cli.command else {
        return hoops_ingest::interactive::run(&config, &multi).await;
    };

    let (pipeline, options) = match command {
        Commands::Sites => {
            println!("{:<10} {:<22} BASE URL", "ID", "NAME");
            println!("{}", "-".repeat(60));
            for line in pipeline::site_listing()? {
                println!("{line}");
            }
            return Ok(());
        }
        Commands::Stats { year, output } => (
            Pipeline::Stats {
                year: year.unwrap_or(config.current_season),
            },
            output.into(),
        ),
        Commands::Contracts { output } => (Pipeline::Contracts, output.into()),
        Commands::ContractTypes { workers, output } => {
            if let Some(workers) = workers {
                config.workers = workers.max(1);
            }
            (Pipeline::ContractTypes, output.into())
        }
        Commands::Positions { output } => (Pipeline::Positions, output.into()),
        Commands::SiteUpdated => (Pipeline::SiteUpdated, OutputOptions::default()),
    };

    pipeline::run(pipeline, &config, &options, &multi).await?;
    Ok(())
}
