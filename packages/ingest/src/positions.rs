//! Player positions pipeline.

use hoops_models::{PositionRecord, Table, columns};
use hoops_scraper::PageFetcher;
use hoops_source::sportsws::SportsWsSite;
use hoops_store::QuoteStyle;

use crate::publish::{OutputOptions, SheetTarget, publish_sheet, write_csv};
use crate::{IngestConfig, IngestError};

/// Sheet behavior of the positions command.
pub const SHEET: SheetTarget = SheetTarget {
    default_tab: "Positions",
    default_range: None,
    stamp: true,
    origin: "positions",
};

/// Scrapes the Sports.ws listing into a table sorted by key.
///
/// # Errors
///
/// Returns [`IngestError::Source`] if the listing cannot be fetched or
/// has no player links.
pub async fn build_positions_table(
    fetcher: &impl PageFetcher,
    site: &SportsWsSite,
) -> Result<Table, IngestError> {
    let records = site.fetch_positions(fetcher).await?;

    let mut table = Table::new(PositionRecord::HEADERS);
    for record in &records {
        table.push_row(record.to_row());
    }
    table.sort_by_columns(&[columns::PLAYER_KEY])?;
    Ok(table)
}

/// Runs the positions command.
///
/// # Errors
///
/// Returns [`IngestError`] if scraping, writing or publishing fails.
pub async fn run(
    fetcher: &impl PageFetcher,
    site: &SportsWsSite,
    config: &IngestConfig,
    options: &OutputOptions,
) -> Result<Table, IngestError> {
    let table = build_positions_table(fetcher, site).await?;
    log::info!("Found positions for {} player(s)", table.len());

    write_csv(
        options,
        &config.data_dir.positions_csv(),
        &table,
        QuoteStyle::Necessary,
    )?;
    publish_sheet(config, options, &SHEET, &table).await?;
    Ok(table)
}
