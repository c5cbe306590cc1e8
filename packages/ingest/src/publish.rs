//! CSV and Google Sheets output shared by every pipeline.

use std::path::Path;

use hoops_models::Table;
use hoops_sheets::{PublishOptions, SheetsClient};
use hoops_store::QuoteStyle;

use crate::{IngestConfig, IngestError};

/// Where a run's results go, as chosen on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Write the CSV output.
    pub update_csv: bool,
    /// Publish to Google Sheets.
    pub update_sheets: bool,
    /// Tab name, overriding `SHEET_NAME` and the command default.
    pub sheet: Option<String>,
    /// Range to clear, overriding the command default.
    pub range: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            update_csv: true,
            update_sheets: false,
            sheet: None,
            range: None,
        }
    }
}

/// How one command publishes to its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetTarget {
    /// Tab used when neither `--sheet` nor `SHEET_NAME` is given.
    pub default_tab: &'static str,
    /// Range cleared when `--range` is not given; `None` clears the tab.
    pub default_range: Option<&'static str>,
    /// Whether to write the "Last updated" stamp in `A1`.
    pub stamp: bool,
    /// Command name shown in the stamp.
    pub origin: &'static str,
}

impl SheetTarget {
    /// Tab to publish to: `--sheet`, then `SHEET_NAME`, then the default.
    #[must_use]
    pub fn tab(&self, options: &OutputOptions, config: &IngestConfig) -> String {
        options
            .sheet
            .clone()
            .or_else(|| config.sheet_name.clone())
            .unwrap_or_else(|| self.default_tab.to_owned())
    }

    /// Sheet options for this target.
    #[must_use]
    pub fn publish_options(&self, options: &OutputOptions) -> PublishOptions {
        let mut publish = PublishOptions::default();
        if let Some(range) = options.range.as_deref().or(self.default_range) {
            publish = publish.with_clear_range(range);
        }
        if self.stamp {
            publish = publish.with_stamp(self.origin);
        }
        publish
    }
}

/// Writes `table` to `path` when CSV output is enabled.
///
/// # Errors
///
/// Returns [`IngestError::Store`] if the file cannot be written.
pub fn write_csv(
    options: &OutputOptions,
    path: &Path,
    table: &Table,
    style: QuoteStyle,
) -> Result<(), IngestError> {
    if options.update_csv {
        hoops_store::write_table(path, table, style)?;
    } else {
        log::debug!("CSV output disabled; not writing {}", path.display());
    }
    Ok(())
}

/// Publishes `table` to its sheet when sheet output is enabled.
///
/// # Errors
///
/// Returns [`IngestError::Sheets`] if credentials are missing or any
/// Sheets request fails.
pub async fn publish_sheet(
    config: &IngestConfig,
    options: &OutputOptions,
    target: &SheetTarget,
    table: &Table,
) -> Result<(), IngestError> {
    if !options.update_sheets {
        return Ok(());
    }

    let tab = target.tab(options, config);
    let client = SheetsClient::connect(&config.sheets_settings()?).await?;
    client
        .publish_table(&tab, table, &target.publish_options(options))
        .await?;
    Ok(())
}
