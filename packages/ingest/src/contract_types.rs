//! Contract types pipeline.
//!
//! Visits the contract page of every active player in the contracts CSV
//! and records how their deal was signed. Each result is appended to
//! `contract_types_progress.csv` as it arrives, so an interrupted run
//! resumes where it stopped. Once every active player is in that file, the
//! next run starts over. `contract_types.csv` is rebuilt from it after each
//! run, minus stale free agency records.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use hoops_identity::title_case;
use hoops_models::{ContractDetail, PlayerKey, Table, columns};
use hoops_scraper::PageFetcher;
use hoops_source::batch::{DetailTarget, scrape_contract_details};
use hoops_source::progress::ProgressCallback;
use hoops_source::spotrac::SpotracSite;
use hoops_store::QuoteStyle;
use regex::Regex;

use crate::publish::{OutputOptions, SheetTarget, publish_sheet};
use crate::{IngestConfig, IngestError};

/// Sheet behavior of the contract-types command.
pub const SHEET: SheetTarget = SheetTarget {
    default_tab: "Contract Types",
    default_range: Some("A:E"),
    stamp: true,
    origin: "contract-types",
};

static SEASON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-\d{2}$").expect("valid regex"));

/// `Signed Using` values such as `2023 / RFA` left over from a past
/// free agency.
static FREE_AGENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{4})\s*/\s*(RFA|UFA)$").expect("valid regex"));

/// First-season values marking a player without a current contract.
const INACTIVE: [&str; 3] = ["Two-Way", "-", ""];

/// Returns the index and start year of the first season column.
#[must_use]
pub fn first_season(contracts: &Table) -> Option<(usize, u16)> {
    contracts.headers().iter().enumerate().find_map(|(i, h)| {
        SEASON_RE
            .captures(h)
            .and_then(|c| c[1].parse().ok())
            .map(|year| (i, year))
    })
}

/// Players whose contract pages should be scraped: unique by link and
/// key, sorted by key.
///
/// A player is active unless their first-season cell is `Two-Way`, `-`
/// or blank. Without a season column every linked player counts as active.
///
/// # Errors
///
/// Returns [`IngestError::Table`] if the player columns are missing.
pub fn active_targets(contracts: &Table) -> Result<Vec<DetailTarget>, IngestError> {
    let name = contracts.require_column(columns::PLAYER)?;
    let link = contracts.require_column(columns::PLAYER_LINK)?;
    let key = contracts.require_column(columns::PLAYER_KEY)?;
    let season = first_season(contracts).map(|(col, _)| col);
    if season.is_none() {
        log::warn!("Contracts table has no season columns; treating every player as active");
    }

    let mut seen = BTreeSet::new();
    let mut targets: Vec<DetailTarget> = contracts
        .rows()
        .iter()
        .filter(|row| season.is_none_or(|col| !INACTIVE.contains(&row[col].trim())))
        .filter(|row| !row[link].is_empty())
        .filter(|row| seen.insert((row[link].clone(), row[key].clone())))
        .map(|row| DetailTarget {
            name: row[name].clone(),
            url: row[link].clone(),
            key: PlayerKey::from_normalized(row[key].clone()),
        })
        .collect();
    targets.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(targets)
}

/// Whether `signed_using` records a free agency from `first_year` or
/// earlier, which no longer describes the current deal.
#[must_use]
pub fn is_stale_free_agency(signed_using: &str, first_year: u16) -> bool {
    FREE_AGENCY_RE
        .captures(signed_using.trim())
        .and_then(|c| c[1].parse::<u16>().ok())
        .is_some_and(|year| year <= first_year)
}

/// Splits `targets` into those still to scrape, given the links already
/// scraped. Returns `true` as the second value when every target link has
/// been scraped and the run should start over with all of them.
///
/// Scraped links that are no longer targets do not count.
#[must_use]
pub fn pending_targets(
    targets: Vec<DetailTarget>,
    done: &BTreeSet<String>,
) -> (Vec<DetailTarget>, bool) {
    let pending: Vec<DetailTarget> = targets
        .iter()
        .filter(|t| !done.contains(&t.url))
        .cloned()
        .collect();
    if pending.is_empty() {
        return (targets, true);
    }
    (pending, false)
}

/// Links recorded in the progress file, or `None` if there is no progress
/// yet (missing or empty file).
fn scraped_links(path: &Path) -> Result<Option<BTreeSet<String>>, IngestError> {
    let Some(existing) = hoops_store::read_table_if_exists(path)? else {
        return Ok(None);
    };
    if existing.headers().is_empty() {
        return Ok(None);
    }
    let link = existing.require_column(columns::PLAYER_LINK)?;
    Ok(Some(
        existing.rows().iter().map(|row| row[link].clone()).collect(),
    ))
}

/// Scrapes contract types for every active player, resuming from the
/// progress file, then rewrites `contract_types.csv` filtered and sorted.
///
/// # Errors
///
/// Returns [`IngestError`] if the contracts CSV cannot be read or the
/// output cannot be written. Individual page failures are recorded with
/// empty values instead.
pub async fn scrape(
    fetcher: &impl PageFetcher,
    site: &SpotracSite,
    config: &IngestConfig,
    progress: &dyn ProgressCallback,
) -> Result<Table, IngestError> {
    let contracts = hoops_store::read_table(&config.data_dir.contracts_csv())?;
    let targets = active_targets(&contracts)?;
    log::info!("Found {} unique player link(s) to scrape", targets.len());

    let progress_path = config.data_dir.contract_types_progress_csv();
    let done = scraped_links(&progress_path)?;
    let (pending, restart) = pending_targets(targets, done.as_ref().unwrap_or(&BTreeSet::new()));
    if restart {
        log::info!("Every player link has already been scraped; starting over");
    } else {
        log::info!(
            "Resuming: {} already scraped, {} remaining",
            done.as_ref().map_or(0, BTreeSet::len),
            pending.len()
        );
    }
    if restart || done.is_none() {
        hoops_store::reset(&progress_path, &ContractDetail::HEADERS)?;
    }

    let summary = scrape_contract_details(
        fetcher,
        site,
        pending,
        config.workers,
        progress,
        |mut detail| {
            detail.signed_using = detail.signed_using.map(|s| title_case(&s));
            hoops_store::append_rows(
                &progress_path,
                &ContractDetail::HEADERS,
                &[detail.to_row()],
            )
        },
    )
    .await?;
    log::info!(
        "Contract pages: {} scraped, {} failed",
        summary.scraped,
        summary.failed
    );

    let first_year = first_season(&contracts).map_or(config.current_season, |(_, year)| year);
    let mut table = hoops_store::read_table(&progress_path)?;
    let signed = table.require_column(columns::SIGNED_USING)?;
    let before = table.len();
    table.retain(|row| !is_stale_free_agency(&row[signed], first_year));
    log::info!(
        "Removed {} stale free agency record(s) (year <= {first_year})",
        before - table.len()
    );

    table.sort_by_columns(&[columns::PLAYER_KEY])?;
    hoops_store::write_table(
        &config.data_dir.contract_types_csv(),
        &table,
        QuoteStyle::Necessary,
    )?;
    Ok(table)
}

/// Runs the contract-types command.
///
/// With CSV output on, scrapes and rewrites `contract_types.csv`. With
/// sheet output on, publishes that file.
///
/// # Errors
///
/// Returns [`IngestError`] if scraping, reading or publishing fails.
pub async fn run(
    fetcher: &impl PageFetcher,
    site: &SpotracSite,
    config: &IngestConfig,
    options: &OutputOptions,
    progress: &dyn ProgressCallback,
) -> Result<(), IngestError> {
    let table = if options.update_csv {
        Some(scrape(fetcher, site, config, progress).await?)
    } else {
        None
    };

    if options.update_sheets {
        let table = match table {
            Some(table) => table,
            None => hoops_store::read_table(&config.data_dir.contract_types_csv())?,
        };
        publish_sheet(config, options, &SHEET, &table).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hoops_source::SiteRegistry;
    use hoops_source::progress::NullProgress;
    use hoops_source::test_support::StubFetcher;
    use hoops_store::DataDir;

    use super::*;

    const CONTRACTS: &str = "\
Player,Player Link,Player Key,Team,Team Link,Position,Age,2025-26,2026-27
Zach Cole,https://www.spotrac.com/nba/player/_/id/3/zach-cole,zach-cole,Utah Jazz,,C,30,$9000000,UFA
Amy Ames,https://www.spotrac.com/nba/player/_/id/1/amy-ames,amy-ames,Utah Jazz,,G,22,$1000000,
Two Way,https://www.spotrac.com/nba/player/_/id/9/two-way,two-way,Utah Jazz,,F,21,Two-Way,
Gone Guy,https://www.spotrac.com/nba/player/_/id/8/gone-guy,gone-guy,Utah Jazz,,F,35,,
Amy Ames,https://www.spotrac.com/nba/player/_/id/1/amy-ames,amy-ames,LA Clippers,,G,22,$1000000,
Bo Best,https://www.spotrac.com/nba/player/_/id/2/bo-best,bo-best,LA Clippers,,F,27,$2000000,RFA
";

    fn player_page(signed: &str) -> String {
        format!(
            r#"<div id="main"><section><article>
                 <div class="row m-0 mt-0 pb-3"><div class="col-md-6"><div>
                   <div><span>2019 2nd Round</span></div>
                 </div></div></div>
               </article></section></div>
               <div id="contracts"><div><div><div class="contract-wrapper mb-5">
                 <div class="contract-details row m-0">
                   <div></div><div></div><div></div><div></div>
                   <div><div class="label">Signed Using</div><div>{signed}</div></div>
                 </div></div></div></div></div>"#
        )
    }

    fn setup(dir: &Path) -> (IngestConfig, SpotracSite) {
        let config = IngestConfig::default().with_data_dir(DataDir::new(dir));
        std::fs::write(config.data_dir.contracts_csv(), CONTRACTS).unwrap();
        (config, SiteRegistry::load().unwrap().spotrac)
    }

    fn link(id: u32, slug: &str) -> String {
        format!("https://www.spotrac.com/nba/player/_/id/{id}/{slug}")
    }

    fn contracts_table() -> Table {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.csv");
        std::fs::write(&path, CONTRACTS).unwrap();
        hoops_store::read_table(&path).unwrap()
    }

    #[test]
    fn finds_first_season() {
        assert_eq!(first_season(&contracts_table()), Some((7, 2025)));
        assert_eq!(first_season(&Table::new(["Player", "Age"])), None);
    }

    #[test]
    fn active_targets_are_unique_and_sorted() {
        let targets = active_targets(&contracts_table()).unwrap();
        let keys: Vec<&str> = targets.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["amy-ames", "bo-best", "zach-cole"]);
    }

    #[test]
    fn stale_free_agency_depends_on_year() {
        assert!(is_stale_free_agency("2025 / UFA", 2025));
        assert!(is_stale_free_agency("2019/rfa", 2025));
        assert!(!is_stale_free_agency("2026 / RFA", 2025));
        assert!(!is_stale_free_agency("Bird Rights", 2025));
        assert!(!is_stale_free_agency("2025 / Bird", 2025));
    }

    #[test]
    fn resume_skips_done_links_and_restarts_when_complete() {
        let targets = active_targets(&contracts_table()).unwrap();
        let done: BTreeSet<String> = [link(1, "amy-ames")].into();
        let (pending, restart) = pending_targets(targets.clone(), &done);
        assert!(!restart);
        assert_eq!(pending.len(), 2);

        let done: BTreeSet<String> = targets.iter().map(|t| t.url.clone()).collect();
        let (pending, restart) = pending_targets(targets, &done);
        assert!(restart);
        assert_eq!(pending.len(), 3);
    }

    #[test]
    fn links_no_longer_targeted_do_not_count_as_done() {
        let targets = active_targets(&contracts_table()).unwrap();
        let done: BTreeSet<String> = [
            link(1, "amy-ames"),
            link(2, "bo-best"),
            link(99, "waived-guy"),
        ]
        .into();

        let (pending, restart) = pending_targets(targets, &done);

        assert!(!restart);
        let urls: Vec<&str> = pending.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, [link(3, "zach-cole")]);
    }

    #[tokio::test]
    async fn scrapes_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let (config, site) = setup(dir.path());
        let fetcher = StubFetcher::new([
            (link(1, "amy-ames"), player_page("cap space")),
            (link(2, "bo-best"), player_page("2024 / RFA")),
        ]);

        let table = scrape(&fetcher, &site, &config, &NullProgress).await.unwrap();

        assert_eq!(table.headers(), ContractDetail::HEADERS);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "Player Key"), Some("amy-ames"));
        assert_eq!(table.value(0, "Signed Using"), Some("Cap Space"));
        assert_eq!(table.value(0, "Drafted"), Some("2019 2nd Round"));
        // zach-cole's page failed and is kept with empty values
        assert_eq!(table.value(1, "Player Key"), Some("zach-cole"));
        assert_eq!(table.value(1, "Signed Using"), Some(""));

        let on_disk = hoops_store::read_table(&config.data_dir.contract_types_csv()).unwrap();
        assert_eq!(on_disk, table);

        // the stale bo-best row stays in the progress file
        let progress =
            hoops_store::read_table(&config.data_dir.contract_types_progress_csv()).unwrap();
        assert_eq!(progress.len(), 3);
    }

    #[tokio::test]
    async fn filtered_players_are_not_scraped_again() {
        let dir = tempfile::tempdir().unwrap();
        let (config, site) = setup(dir.path());
        let first = StubFetcher::new([
            (link(1, "amy-ames"), player_page("Minimum")),
            (link(2, "bo-best"), player_page("2024 / RFA")),
            (link(3, "zach-cole"), player_page("Bird Rights")),
        ]);
        let table = scrape(&first, &site, &config, &NullProgress).await.unwrap();
        assert_eq!(table.len(), 2);

        let mut contracts = std::fs::read_to_string(config.data_dir.contracts_csv()).unwrap();
        let cy = link(4, "cy-new");
        contracts.push_str(&format!("Cy New,{cy},cy-new,Utah Jazz,,G,20,$1500000,\n"));
        std::fs::write(config.data_dir.contracts_csv(), contracts).unwrap();
        let second = StubFetcher::new([(link(4, "cy-new"), player_page("Rookie Scale"))]);

        let table = scrape(&second, &site, &config, &NullProgress).await.unwrap();

        assert_eq!(second.requested(), [link(4, "cy-new")]);
        let keys: Vec<&str> = (0..3).map(|i| table.value(i, "Player Key").unwrap()).collect();
        assert_eq!(keys, ["amy-ames", "cy-new", "zach-cole"]);
    }

    #[tokio::test]
    async fn empty_progress_file_counts_as_no_progress() {
        let dir = tempfile::tempdir().unwrap();
        let (config, site) = setup(dir.path());
        std::fs::write(config.data_dir.contract_types_progress_csv(), "").unwrap();
        let fetcher = StubFetcher::new([(link(1, "amy-ames"), player_page("Minimum"))]);

        let table = scrape(&fetcher, &site, &config, &NullProgress).await.unwrap();

        assert_eq!(fetcher.requested().len(), 3);
        assert_eq!(table.headers(), ContractDetail::HEADERS);
        assert_eq!(table.value(0, "Signed Using"), Some("Minimum"));
    }

    #[tokio::test]
    async fn resumes_from_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let (config, site) = setup(dir.path());
        hoops_store::append_rows(
            &config.data_dir.contract_types_progress_csv(),
            &ContractDetail::HEADERS,
            &[vec![
                "Zach Cole".into(),
                link(3, "zach-cole"),
                "zach-cole".into(),
                "Bird Rights".into(),
                String::new(),
            ]],
        )
        .unwrap();
        let fetcher = StubFetcher::new([
            (link(1, "amy-ames"), player_page("Minimum")),
            (link(2, "bo-best"), player_page("Rookie Scale Exception")),
            (link(3, "zach-cole"), player_page("should not be fetched")),
        ]);

        let table = scrape(&fetcher, &site, &config, &NullProgress).await.unwrap();

        let signed: Vec<&str> = (0..3).map(|i| table.value(i, "Signed Using").unwrap()).collect();
        assert_eq!(signed, ["Minimum", "Rookie Scale Exception", "Bird Rights"]);
    }

    #[tokio::test]
    async fn csv_off_publishes_nothing_and_scrapes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (config, site) = setup(dir.path());
        let options = OutputOptions {
            update_csv: false,
            ..OutputOptions::default()
        };

        run(&StubFetcher::new([]), &site, &config, &options, &NullProgress)
            .await
            .unwrap();
        assert!(!config.data_dir.contract_types_csv().exists());
    }
}
