//! Season totals pipeline.
//!
//! Fetches Basketball-Reference season totals, keys and deduplicates the
//! players, zero-fills the stat columns, and appends the fantasy metrics.

use hoops_identity::player_key;
use hoops_metrics::{coerce_stat, compute};
use hoops_models::{PlayerKey, PlayerRecord, StatTotals, Table, TableError, columns};
use hoops_scraper::PageFetcher;
use hoops_source::bbref::BbrefSite;
use hoops_store::QuoteStyle;

use crate::publish::{OutputOptions, SheetTarget, publish_sheet, write_csv};
use crate::{IngestConfig, IngestError};

/// Sheet behavior of the stats command.
pub const SHEET: SheetTarget = SheetTarget {
    default_tab: "Stats",
    default_range: None,
    stamp: true,
    origin: "stats",
};

/// Position column on the totals table.
const POS: &str = "Pos";

/// Fetches the totals for `year` and turns them into the stats table.
///
/// # Errors
///
/// Returns [`IngestError`] if the page cannot be fetched or lacks the
/// `Player` column.
pub async fn build_stats_table(
    fetcher: &impl PageFetcher,
    site: &BbrefSite,
    config: &IngestConfig,
    year: u16,
) -> Result<Table, IngestError> {
    let mut table = site.fetch_totals(fetcher, year).await?;
    prepare_stats(&mut table, &config.numeric_columns)?;
    Ok(table)
}

/// Keys, sorts, deduplicates and scores a raw totals table in place.
///
/// Rows are sorted once by (`Player Key`, `Team`) and only the first row
/// per key is kept, which for a traded player is the multi-team total
/// (`2TM`, `3TM`) since digits sort before team abbreviations.
///
/// # Errors
///
/// Returns [`TableError::MissingColumn`] if `Player` is absent.
pub fn prepare_stats(table: &mut Table, numeric_columns: &[String]) -> Result<(), TableError> {
    let player = table.require_column(columns::PLAYER)?;
    table.add_column(columns::PLAYER_KEY, |row| {
        player_key(&row[player]).into_inner()
    });

    if table.column(columns::TEAM).is_some() {
        table.sort_by_columns(&[columns::PLAYER_KEY, columns::TEAM])?;
    } else {
        table.sort_by_columns(&[columns::PLAYER_KEY])?;
    }
    let dropped = table.dedup_by_column(columns::PLAYER_KEY)?;
    if dropped > 0 {
        log::debug!("Dropped {dropped} per-team row(s) of traded players");
    }

    for name in numeric_columns {
        if table.column(name).is_none() {
            log::warn!("Numeric column {name} is not in the totals table");
            continue;
        }
        table.map_column(name, |cell| format_stat(coerce_stat(cell)))?;
    }

    let metrics: Vec<[String; 5]> = player_records(table)?
        .iter()
        .map(|record| compute(&record.totals).to_cells())
        .collect();
    for (i, name) in columns::METRICS.iter().enumerate() {
        let mut cells = metrics.iter().map(|m| m[i].clone());
        table.add_column(name, |_| cells.next().unwrap_or_default());
    }

    Ok(())
}

/// Reads each row of a keyed totals table as a [`PlayerRecord`]. Missing
/// or unparsable stat cells read as zero.
///
/// # Errors
///
/// Returns [`TableError::MissingColumn`] if `Player` or `Player Key` is
/// absent.
pub fn player_records(table: &Table) -> Result<Vec<PlayerRecord>, TableError> {
    let player = table.require_column(columns::PLAYER)?;
    let key = table.require_column(columns::PLAYER_KEY)?;
    let col = |name: &str| table.column(name);
    let (team, pos, age) = (col(columns::TEAM), col(POS), col(columns::AGE));
    let (player_link, team_link) = (col(columns::PLAYER_LINK), col(columns::TEAM_LINK));
    let stats = ["PTS", "TRB", "AST", "STL", "BLK", "TOV", "PF", "G", "MP"].map(col);

    Ok(table
        .rows()
        .iter()
        .map(|row| {
            let text = |c: Option<usize>| c.map(|c| row[c].clone()).unwrap_or_default();
            let link = |c: Option<usize>| Some(text(c)).filter(|s| !s.is_empty());
            let [pts, trb, ast, stl, blk, tov, pf, g, mp] =
                stats.map(|c| c.map_or(0.0, |c| coerce_stat(&row[c])));

            PlayerRecord {
                name: row[player].clone(),
                url: link(player_link),
                key: PlayerKey::from_normalized(row[key].clone()),
                team: text(team),
                team_url: link(team_link),
                position: text(pos),
                age: text(age).trim().parse().ok(),
                totals: StatTotals {
                    pts,
                    trb,
                    ast,
                    stl,
                    blk,
                    tov,
                    pf,
                    g,
                    mp,
                },
            }
        })
        .collect())
}

/// Formats a coerced stat, dropping the fraction of whole numbers.
fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Runs the stats command for `year`.
///
/// The current season goes to `bbref_stats.csv`; other years go to the
/// archive with every field quoted.
///
/// # Errors
///
/// Returns [`IngestError`] if scraping, writing or publishing fails.
pub async fn run(
    fetcher: &impl PageFetcher,
    site: &BbrefSite,
    config: &IngestConfig,
    year: u16,
    options: &OutputOptions,
) -> Result<Table, IngestError> {
    let table = build_stats_table(fetcher, site, config, year).await?;
    log::info!("Built stats for {} player(s) in {year}", table.len());

    if year == config.current_season {
        write_csv(options, &config.data_dir.stats_csv(), &table, QuoteStyle::Necessary)?;
    } else {
        let path = config.data_dir.archive_csv(year);
        write_csv(options, &path, &table, QuoteStyle::Always)?;
    }

    publish_sheet(config, options, &SHEET, &table).await?;
    Ok(table)
}
