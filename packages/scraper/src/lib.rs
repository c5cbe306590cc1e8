#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP fetching with retry and HTML table extraction.
//!
//! [`PageFetcher`] is the seam between the site adapters and the network:
//! [`http::HttpFetcher`] implements it over `reqwest` with the
//! [`retry::RetryPolicy`] loop, and tests substitute canned pages.
//! [`html_table::HtmlTable`] turns a fetched page into headers and rows.
//!
//! Errors are split by how a caller should react: a [`FetchError`] is
//! transient and has already been retried, a [`ParseError`] means the page
//! no longer has the structure the adapter expects.

pub mod dom;
pub mod html_table;
pub mod http;
pub mod retry;

pub use html_table::{Anchor, HtmlTable, ScrapedRow, ScrapedTable, TableLocator};
pub use http::HttpFetcher;
pub use retry::RetryPolicy;

/// Errors raised while fetching a page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },

    /// The server answered with something other than `200 OK`.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status code received.
        status: u16,
    },

    /// Every attempt allowed by the retry policy failed.
    #[error("Giving up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        /// Requested URL.
        url: String,
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        last: Box<Self>,
    },

    /// A configured request header is not valid HTTP.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader {
        /// Header name as configured.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Errors raised when a page does not have the expected structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A configured CSS selector does not parse.
    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector {
        /// Selector text.
        selector: String,
        /// Parser message.
        message: String,
    },

    /// No element matched a required selector.
    #[error("No element matching '{selector}' found in page")]
    MissingElement {
        /// Selector that matched nothing.
        selector: String,
    },

    /// The table was found but has no header cells.
    #[error("No header cells matching '{selector}' in table '{table}'")]
    MissingHeaders {
        /// Table selector.
        table: String,
        /// Header cell selector.
        selector: String,
    },
}

/// Source of page bodies keyed by URL.
pub trait PageFetcher: Send + Sync {
    /// Fetches the body of `url` as text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the page could not be fetched.
    fn fetch_text(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<String, FetchError>> + Send;
}
