#![allow(clippy::module_name_repetitions)]

//! Interactive menu for the ingest tool.
//!
//! Lets a user pick a pipeline and its outputs with `dialoguer` prompts
//! instead of remembering command-line flags.

use dialoguer::{Confirm, Input, Select};
use hoops_cli_utils::MultiProgress;

use crate::pipeline::{self, Pipeline};
use crate::publish::OutputOptions;
use crate::IngestConfig;

/// Top-level actions available in the menu.
enum IngestAction {
    Stats,
    Contracts,
    ContractTypes,
    Positions,
    SiteUpdated,
    ListSites,
}

impl IngestAction {
    const ALL: &[Self] = &[
        Self::Stats,
        Self::Contracts,
        Self::ContractTypes,
        Self::Positions,
        Self::SiteUpdated,
        Self::ListSites,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Stats => "Scrape season stats",
            Self::Contracts => "Scrape team contracts",
            Self::ContractTypes => "Scrape contract types",
            Self::Positions => "Scrape player positions",
            Self::SiteUpdated => "Check when Basketball-Reference last updated",
            Self::ListSites => "List sites",
        }
    }
}

/// Prompts for a pipeline and its outputs, then runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected pipeline fails.
pub async fn run(
    config: &IngestConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = IngestAction::ALL.iter().map(IngestAction::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let mut config = config.clone();
    let pipeline = match IngestAction::ALL[idx] {
        IngestAction::Stats => {
            let year: u16 = Input::new()
                .with_prompt("Season end year")
                .default(config.current_season)
                .interact_text()?;
            Pipeline::Stats { year }
        }
        IngestAction::Contracts => Pipeline::Contracts,
        IngestAction::ContractTypes => {
            config.workers = Input::<usize>::new()
                .with_prompt("Concurrent page fetches")
                .default(config.workers)
                .interact_text()?
                .max(1);
            Pipeline::ContractTypes
        }
        IngestAction::Positions => Pipeline::Positions,
        IngestAction::SiteUpdated => Pipeline::SiteUpdated,
        IngestAction::ListSites => {
            for line in pipeline::site_listing()? {
                println!("{line}");
            }
            return Ok(());
        }
    };

    let options = if pipeline == Pipeline::SiteUpdated {
        OutputOptions::default()
    } else {
        prompt_outputs()?
    };

    pipeline::run(pipeline, &config, &options, multi).await?;
    Ok(())
}

/// Asks which outputs to write.
fn prompt_outputs() -> Result<OutputOptions, dialoguer::Error> {
    let update_csv = Confirm::new()
        .with_prompt("Write CSV output?")
        .default(true)
        .interact()?;
    let update_sheets = Confirm::new()
        .with_prompt("Update Google Sheets?")
        .default(false)
        .interact()?;

    let sheet = if update_sheets {
        let name: String = Input::new()
            .with_prompt("Sheet tab (empty for the default)")
            .allow_empty(true)
            .interact_text()?;
        Some(name.trim().to_owned()).filter(|n| !n.is_empty())
    } else {
        None
    };

    Ok(OutputOptions {
        update_csv,
        update_sheets,
        sheet,
        range: None,
    })
}
