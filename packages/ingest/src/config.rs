//! Run configuration.
//!
//! Read once at start-up; pipelines never consult the environment
//! themselves.
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `HOOPS_DATA_DIR` | `data` | Root of the CSV outputs |
//! | `HOOPS_CURRENT_SEASON` | `2025` | End year of the current season |
//! | `HOOPS_WORKERS` | `5` | Concurrent contract page fetches |
//! | `NUMERIC_COLUMNS` | `PTS,TRB,AST,STL,BLK,TOV,PF,G,MP` | Stats zero-filled on parse failure |
//! | `SHEET_NAME` | per command | Overrides each command's default tab |
//! | `GOOGLE_SHEETS_CREDENTIALS` | | Service-account key path |
//! | `GOOGLE_SHEETS_URL` | | Spreadsheet URL |

use std::path::PathBuf;
use std::str::FromStr;

use hoops_models::columns;
use hoops_sheets::{SheetsError, SheetsSettings};
use hoops_store::DataDir;

use crate::IngestError;

/// Season used when `HOOPS_CURRENT_SEASON` is unset.
pub const DEFAULT_SEASON: u16 = 2025;

/// Worker count used when `HOOPS_WORKERS` is unset.
pub const DEFAULT_WORKERS: usize = 5;

/// Everything a pipeline needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// CSV output locations.
    pub data_dir: DataDir,
    /// End year of the current season; other years go to the archive.
    pub current_season: u16,
    /// Stat columns coerced to numbers.
    pub numeric_columns: Vec<String>,
    /// Contract page pool size.
    pub workers: usize,
    /// Tab name overriding each command's default.
    pub sheet_name: Option<String>,
    /// Service-account key path.
    pub sheets_credentials: Option<PathBuf>,
    /// Spreadsheet URL.
    pub sheets_url: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: DataDir::default(),
            current_season: DEFAULT_SEASON,
            numeric_columns: columns::DEFAULT_NUMERIC
                .iter()
                .map(|c| (*c).to_owned())
                .collect(),
            workers: DEFAULT_WORKERS,
            sheet_name: None,
            sheets_credentials: None,
            sheets_url: None,
        }
    }
}

impl IngestConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Config`] if a numeric variable does not
    /// parse.
    pub fn from_env() -> Result<Self, IngestError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup. Blank
    /// values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Config`] if a numeric variable does not
    /// parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IngestError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let numeric_columns = get("NUMERIC_COLUMNS").map_or(defaults.numeric_columns, |v| {
            v.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect()
        });

        Ok(Self {
            data_dir: get("HOOPS_DATA_DIR").map_or(defaults.data_dir, DataDir::new),
            current_season: parse_var(&get, "HOOPS_CURRENT_SEASON")?
                .unwrap_or(defaults.current_season),
            numeric_columns,
            workers: parse_var(&get, "HOOPS_WORKERS")?
                .unwrap_or(defaults.workers)
                .max(1),
            sheet_name: get("SHEET_NAME"),
            sheets_credentials: get(hoops_sheets::CREDENTIALS_ENV).map(PathBuf::from),
            sheets_url: get(hoops_sheets::URL_ENV),
        })
    }

    /// Replaces the CSV output root.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: DataDir) -> Self {
        self.data_dir = data_dir;
        self
    }

    /// Credentials and spreadsheet for sheet updates.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::MissingEnv`] if either variable is unset.
    pub fn sheets_settings(&self) -> Result<SheetsSettings, SheetsError> {
        SheetsSettings::from_parts(self.sheets_credentials.clone(), self.sheets_url.clone())
    }
}

fn parse_var<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, IngestError> {
    get(name)
        .map(|value| {
            value.parse().map_err(|_| IngestError::Config {
                name: name.to_owned(),
                value,
            })
        })
        .transpose()
}
