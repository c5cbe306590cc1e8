//! Dispatch from a chosen command to its pipeline.

use std::sync::Arc;

use hoops_cli_utils::{IndicatifProgress, MultiProgress};
use hoops_source::SiteRegistry;
use hoops_source::progress::ProgressCallback;

use crate::publish::OutputOptions;
use crate::{
    IngestConfig, IngestError, contract_types, contracts, fetcher_for, positions, site_updated,
    stats,
};

/// A runnable scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// Season totals for the season ending in `year`.
    Stats {
        /// Season end year.
        year: u16,
    },
    /// Team salary tables.
    Contracts,
    /// Contract page details of active players.
    ContractTypes,
    /// Player teams and positions.
    Positions,
    /// Basketball-Reference update notice.
    SiteUpdated,
}

impl Pipeline {
    /// Command name, as used on the command line and in sheet stamps.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stats { .. } => "stats",
            Self::Contracts => "contracts",
            Self::ContractTypes => "contract-types",
            Self::Positions => "positions",
            Self::SiteUpdated => "site-updated",
        }
    }
}

/// Runs `pipeline` against the live sites, drawing progress bars on
/// `multi`.
///
/// # Errors
///
/// Returns [`IngestError`] if the pipeline fails.
pub async fn run(
    pipeline: Pipeline,
    config: &IngestConfig,
    options: &OutputOptions,
    multi: &MultiProgress,
) -> Result<(), IngestError> {
    let sites = SiteRegistry::load()?;
    log::info!("Running {}", pipeline.name());

    match pipeline {
        Pipeline::Stats { year } => {
            let fetcher = fetcher_for(&sites.bbref.site)?;
            stats::run(&fetcher, &sites.bbref, config, year, options).await?;
        }
        Pipeline::Contracts => {
            let fetcher = fetcher_for(&sites.spotrac.site)?;
            let progress: Arc<dyn ProgressCallback> = IndicatifProgress::steps_bar(
                multi,
                "Teams",
                sites.spotrac.teams.len() as u64,
            );
            contracts::run(&fetcher, &sites.spotrac, config, options, progress.as_ref()).await?;
        }
        Pipeline::ContractTypes => {
            let fetcher = fetcher_for(&sites.spotrac.site)?;
            let progress = IndicatifProgress::batch_bar(multi, "Contract pages");
            contract_types::run(&fetcher, &sites.spotrac, config, options, progress.as_ref())
                .await?;
        }
        Pipeline::Positions => {
            let fetcher = fetcher_for(&sites.sportsws.site)?;
            positions::run(&fetcher, &sites.sportsws, config, options).await?;
        }
        Pipeline::SiteUpdated => {
            let fetcher = fetcher_for(&sites.bbref.site)?;
            let updated = site_updated::run(&fetcher, &sites.bbref, config).await?;
            println!("{}: {updated}", sites.bbref.site.name);
        }
    }

    Ok(())
}

/// One `id name base_url` line per configured site.
///
/// # Errors
///
/// Returns [`IngestError::Source`] if a site definition is malformed.
pub fn site_listing() -> Result<Vec<String>, IngestError> {
    let sites = SiteRegistry::load()?;
    Ok(sites
        .sites()
        .iter()
        .map(|s| format!("{:<10} {:<22} {}", s.id, s.name, s.base_url))
        .collect())
}
