#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Google Sheets publishing for scraped tables.
//!
//! Authenticates as a service account, then overwrites a named tab of a
//! spreadsheet with a [`hoops_models::Table`]. Publishing is a full
//! replace: the tab (or a bounded range of it) is cleared before the new
//! rows are written. An optional "Last updated" stamp goes in `A1`, pushing
//! the table down to `A2`.
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |---|---|---|
//! | `GOOGLE_SHEETS_CREDENTIALS` | Yes | Path to the service-account JSON key |
//! | `GOOGLE_SHEETS_URL` | Yes | URL of the target spreadsheet |
//!
//! Both are only needed when a command is asked to update sheets.

pub mod auth;
pub mod client;
pub mod range;

use std::path::PathBuf;

pub use auth::ServiceAccountKey;
pub use client::{PublishOptions, SheetsClient};
pub use range::{a1, spreadsheet_id_from_url};

/// Environment variable naming the service-account key file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_SHEETS_CREDENTIALS";

/// Environment variable holding the spreadsheet URL.
pub const URL_ENV: &str = "GOOGLE_SHEETS_URL";

/// Errors that can occur talking to Google Sheets.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// Missing required environment variable.
    #[error("Missing environment variable: {name}")]
    MissingEnv {
        /// Name of the missing environment variable.
        name: String,
    },

    /// The key file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Key file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A JSON document did not have the expected shape.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The service-account key could not sign a token.
    #[error("Failed to sign access token request: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// The request could not be sent.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google answered with a non-success status.
    #[error("Sheets API returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The spreadsheet URL does not contain an id.
    #[error("Not a spreadsheet URL: {url}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
    },

    /// The spreadsheet has no tab with this name.
    #[error("Spreadsheet has no tab named '{tab}'")]
    TabNotFound {
        /// Requested tab name.
        tab: String,
    },
}

/// Where to find the credentials and the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsSettings {
    /// Path to the service-account JSON key.
    pub credentials_path: PathBuf,
    /// URL of the spreadsheet.
    pub spreadsheet_url: String,
}

impl SheetsSettings {
    /// Builds settings from optional values, naming the first missing
    /// variable in the error.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::MissingEnv`] if either value is absent.
    pub fn from_parts(
        credentials_path: Option<PathBuf>,
        spreadsheet_url: Option<String>,
    ) -> Result<Self, SheetsError> {
        let missing = |name: &str| SheetsError::MissingEnv {
            name: name.to_owned(),
        };
        Ok(Self {
            credentials_path: credentials_path.ok_or_else(|| missing(CREDENTIALS_ENV))?,
            spreadsheet_url: spreadsheet_url.ok_or_else(|| missing(URL_ENV))?,
        })
    }
}

/// Text written to `A1` when a publish is stamped.
#[must_use]
pub fn last_updated_stamp(timestamp: &str, email: &str, origin: &str) -> String {
    format!("Last updated {timestamp} by {email} from {origin}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_names_account_and_origin() {
        assert_eq!(
            last_updated_stamp("2025-04-11 02:13:00", "bot@proj.iam.gserviceaccount.com", "stats"),
            "Last updated 2025-04-11 02:13:00 by bot@proj.iam.gserviceaccount.com from stats"
        );
    }

    #[test]
    fn settings_name_the_missing_variable() {
        let err = SheetsSettings::from_parts(None, Some("u".into())).unwrap_err();
        assert!(matches!(err, SheetsError::MissingEnv { ref name } if name == CREDENTIALS_ENV));

        let err = SheetsSettings::from_parts(Some("k.json".into()), None).unwrap_err();
        assert!(matches!(err, SheetsError::MissingEnv { ref name } if name == URL_ENV));
    }

    #[test]
    fn settings_accept_both_values() {
        let settings =
            SheetsSettings::from_parts(Some("k.json".into()), Some("https://x".into())).unwrap();
        assert_eq!(settings.credentials_path, PathBuf::from("k.json"));
    }
}
