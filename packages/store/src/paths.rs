#![allow(clippy::module_name_repetitions)]
//! Canonical file paths under the data directory.

use std::path::{Path, PathBuf};

/// Root directory all CSV outputs are written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Uses `root` as the data directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the data directory itself.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Season totals for the current season.
    #[must_use]
    pub fn stats_csv(&self) -> PathBuf {
        self.root.join("bbref_stats.csv")
    }

    /// Season totals for a past season.
    #[must_use]
    pub fn archive_csv(&self, year: u16) -> PathBuf {
        self.root
            .join("bbref_archive")
            .join(format!("NBA_{year}_totals.csv"))
    }

    /// Team salary tables.
    #[must_use]
    pub fn contracts_csv(&self) -> PathBuf {
        self.root.join("spotrac_contracts.csv")
    }

    /// Contract types of active players, as published.
    #[must_use]
    pub fn contract_types_csv(&self) -> PathBuf {
        self.root.join("contract_types.csv")
    }

    /// Every contract page scraped so far, unfiltered. Resume state of the
    /// contract-types scrape.
    #[must_use]
    pub fn contract_types_progress_csv(&self) -> PathBuf {
        self.root.join("contract_types_progress.csv")
    }

    /// Player teams and positions.
    #[must_use]
    pub fn positions_csv(&self) -> PathBuf {
        self.root.join("sportsws_positions.csv")
    }

    /// Log of Basketball-Reference update notices.
    #[must_use]
    pub fn update_log_csv(&self) -> PathBuf {
        self.root.join("bbref_update_log.csv")
    }
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new("data")
    }
}
