#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scrape pipelines behind the `hoops_ingest` command.
//!
//! Each pipeline fetches one upstream dataset, normalizes player keys,
//! sorts once by key, and hands the resulting table to [`publish`] for
//! CSV and/or Google Sheets output. Pipelines take an explicit
//! [`IngestConfig`] and any [`hoops_scraper::PageFetcher`], so tests run
//! them against canned pages.

pub mod config;
pub mod contract_types;
pub mod contracts;
pub mod interactive;
pub mod pipeline;
pub mod positions;
pub mod publish;
pub mod site_updated;
pub mod stats;

use hoops_models::TableError;
use hoops_scraper::{FetchError, HttpFetcher, RetryPolicy};
use hoops_sheets::SheetsError;
use hoops_source::{SiteInfo, SourceError};
use hoops_store::StoreError;

pub use config::IngestConfig;
pub use pipeline::Pipeline;
pub use publish::{OutputOptions, SheetTarget};

/// Errors that can stop a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// A site could not be scraped.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A CSV file could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Publishing to Google Sheets failed.
    #[error(transparent)]
    Sheets(#[from] SheetsError),

    /// A table is missing a column the pipeline needs.
    #[error(transparent)]
    Table(#[from] TableError),

    /// An environment variable holds an unusable value.
    #[error("Invalid value for {name}: {value:?}")]
    Config {
        /// Variable name.
        name: String,
        /// Offending value.
        value: String,
    },

    /// Every team page failed, so there is nothing to write.
    #[error("All {teams} team page(s) failed to scrape")]
    NoTeams {
        /// Number of teams attempted.
        teams: usize,
    },
}

/// Builds a retrying HTTP fetcher that sends `site`'s headers.
///
/// # Errors
///
/// Returns [`IngestError::Fetch`] if a header is invalid or the client
/// cannot be built.
pub fn fetcher_for(site: &SiteInfo) -> Result<HttpFetcher, IngestError> {
    Ok(HttpFetcher::new(&site.headers, RetryPolicy::default())?)
}

/// Current local time as written to CSV logs and sheet stamps.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
