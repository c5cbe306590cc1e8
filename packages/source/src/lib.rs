#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Site adapters for the upstream basketball data sources.
//!
//! Each site is described by an embedded TOML definition (see
//! [`registry`]) and parsed by its own adapter module. Adapters turn page
//! bodies into [`hoops_models`] records or raw [`hoops_models::Table`]s and
//! fail with a [`SourceError`] whose [`ErrorClass`] tells the caller
//! whether to retry, skip the entity, or abort the run.

pub mod batch;
pub mod bbref;
pub mod progress;
pub mod registry;
pub mod site_def;
pub mod sportsws;
pub mod spotrac;

use hoops_models::TableError;
use hoops_scraper::{FetchError, ParseError};

pub use registry::SiteRegistry;
pub use site_def::SiteInfo;

/// How a caller should react to a [`SourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Network or server trouble that already exhausted its retries.
    Transient,
    /// The page or configuration does not have the expected shape.
    Structural,
    /// One player or team failed; the rest of the run can continue.
    Entity,
}

/// Errors that can occur while scraping a site.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page does not have the expected structure.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A scraped table is missing a column the adapter relies on.
    #[error("Unexpected table layout: {0}")]
    Table(#[from] TableError),

    /// A single entity could not be scraped.
    #[error("Failed to scrape {entity}: {message}")]
    Field {
        /// URL or name of the entity.
        entity: String,
        /// What went wrong.
        message: String,
    },

    /// A site definition could not be loaded.
    #[error("Invalid site definition '{site}': {message}")]
    Config {
        /// Site id or file name.
        site: String,
        /// Parser message.
        message: String,
    },
}

impl SourceError {
    /// Wraps another error as a per-entity failure.
    #[must_use]
    pub fn entity(entity: &str, source: &Self) -> Self {
        Self::Field {
            entity: entity.to_owned(),
            message: source.to_string(),
        }
    }

    /// Classifies the error for retry/skip/abort decisions.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Fetch(_) => ErrorClass::Transient,
            Self::Parse(_) | Self::Table(_) | Self::Config { .. } => ErrorClass::Structural,
            Self::Field { .. } => ErrorClass::Entity,
        }
    }
}

/// Canned [`PageFetcher`] for adapter and pipeline tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use hoops_scraper::{FetchError, PageFetcher};

    /// Serves canned pages and records every requested URL; unknown URLs
    /// answer 404.
    #[derive(Default)]
    pub struct StubFetcher {
        pages: BTreeMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        /// Serves `pages`, keyed by URL.
        pub fn new<I: IntoIterator<Item = (String, String)>>(pages: I) -> Self {
            Self {
                pages: pages.into_iter().collect(),
                requested: Mutex::default(),
            }
        }

        /// URLs requested so far, in request order.
        ///
        /// # Panics
        ///
        /// Panics if a previous request panicked while recording.
        #[must_use]
        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl PageFetcher for StubFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_owned());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_owned(),
                    status: 404,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors() {
        let fetch = SourceError::from(FetchError::Status {
            url: "u".to_owned(),
            status: 500,
        });
        assert_eq!(fetch.class(), ErrorClass::Transient);

        let parse = SourceError::from(ParseError::MissingElement {
            selector: "table".to_owned(),
        });
        assert_eq!(parse.class(), ErrorClass::Structural);
        assert_eq!(SourceError::entity("u", &fetch).class(), ErrorClass::Entity);
    }
}
