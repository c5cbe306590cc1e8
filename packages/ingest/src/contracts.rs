//! Team contracts pipeline.

use hoops_identity::format_team;
use hoops_models::{ContractRecord, Table, columns};
use hoops_scraper::PageFetcher;
use hoops_source::SourceError;
use hoops_source::progress::ProgressCallback;
use hoops_source::spotrac::SpotracSite;
use hoops_store::QuoteStyle;

use crate::publish::{OutputOptions, SheetTarget, publish_sheet, write_csv};
use crate::{IngestConfig, IngestError};

/// Sheet behavior of the contracts command.
pub const SHEET: SheetTarget = SheetTarget {
    default_tab: "Contracts",
    default_range: None,
    stamp: false,
    origin: "contracts",
};

/// Scrapes every team's yearly salary page into one table sorted by key.
///
/// The season columns come from the first team that scrapes cleanly. A
/// team that fails is logged and skipped.
///
/// # Errors
///
/// Returns [`IngestError::NoTeams`] if every team fails.
pub async fn build_contracts_table(
    fetcher: &impl PageFetcher,
    site: &SpotracSite,
    progress: &dyn ProgressCallback,
) -> Result<Table, IngestError> {
    progress.set_total(site.teams.len() as u64);

    let mut seasons: Option<Vec<String>> = None;
    let mut records: Vec<ContractRecord> = Vec::new();
    let mut failed = 0usize;

    for team in &site.teams {
        progress.set_message(format_team(team));
        match site.fetch_team_contracts(fetcher, team).await {
            Ok(contracts) => {
                log::debug!("{team}: {} contract(s)", contracts.records.len());
                seasons.get_or_insert(contracts.seasons);
                records.extend(contracts.records);
            }
            Err(e) => {
                log::warn!("{}", SourceError::entity(team, &e));
                failed += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish(format!(
        "{} team(s) scraped, {failed} failed",
        site.teams.len() - failed
    ));

    let Some(seasons) = seasons else {
        return Err(IngestError::NoTeams {
            teams: site.teams.len(),
        });
    };

    let mut table = Table::new(ContractRecord::headers(&seasons));
    for record in &records {
        table.push_row(record.to_row());
    }
    table.sort_by_columns(&[columns::PLAYER_KEY])?;
    Ok(table)
}

/// Runs the contracts command.
///
/// # Errors
///
/// Returns [`IngestError`] if every team fails, or writing or publishing
/// fails.
pub async fn run(
    fetcher: &impl PageFetcher,
    site: &SpotracSite,
    config: &IngestConfig,
    options: &OutputOptions,
    progress: &dyn ProgressCallback,
) -> Result<Table, IngestError> {
    let table = build_contracts_table(fetcher, site, progress).await?;
    log::info!("Built contracts for {} player(s)", table.len());

    write_csv(
        options,
        &config.data_dir.contracts_csv(),
        &table,
        QuoteStyle::Necessary,
    )?;
    publish_sheet(config, options, &SHEET, &table).await?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use hoops_source::SiteRegistry;
    use hoops_source::progress::NullProgress;
    use hoops_source::test_support::StubFetcher;
    use hoops_store::DataDir;

    use super::*;

    fn team_page(players: &[(&str, &str)]) -> String {
        let rows: String = players
            .iter()
            .map(|(name, salary)| {
                format!(
                    "<tr><td><a href=\"/nba/player/_/id/1/{name}\">{name}</a></td>\
                     <td>G</td><td>25</td><td>{salary}</td><td>-</td></tr>"
                )
            })
            .collect();
        format!(
            "<table id=\"dataTable-active\"><thead><tr><th>Player</th><th>Pos</th>\
             <th>Age</th><th>2025-26</th><th>2026-27</th></tr></thead>\
             <tbody>{rows}</tbody></table>"
        )
    }

    fn site_with_teams(teams: &[&str]) -> SpotracSite {
        let mut site = SiteRegistry::load().unwrap().spotrac;
        site.teams = teams.iter().map(|t| (*t).to_owned()).collect();
        site
    }

    #[tokio::test]
    async fn failing_team_is_skipped() {
        let site = site_with_teams(&["boston-celtics", "utah-jazz", "la-clippers"]);
        let fetcher = StubFetcher::new([
            (
                site.team_url("boston-celtics"),
                team_page(&[("Zed Young", "$5,000,000"), ("Al Brown", "Two-Way")]),
            ),
            (site.team_url("la-clippers"), team_page(&[("Mo Bamba", "$2,100,000")])),
        ]);

        let table = build_contracts_table(&fetcher, &site, &NullProgress)
            .await
            .unwrap();

        assert_eq!(
            table.headers(),
            [
                "Player",
                "Player Link",
                "Player Key",
                "Team",
                "Team Link",
                "Position",
                "Age",
                "2025-26",
                "2026-27"
            ]
        );
        let keys: Vec<&str> = (0..3).map(|i| table.value(i, "Player Key").unwrap()).collect();
        assert_eq!(keys, ["al-brown", "mo-bamba", "zed-young"]);
        assert_eq!(table.value(1, "Team"), Some("LA Clippers"));
        assert_eq!(table.value(2, "2025-26"), Some("$5000000"));
        assert_eq!(table.value(0, "2025-26"), Some("Two-Way"));
    }

    #[tokio::test]
    async fn all_teams_failing_is_an_error() {
        let site = site_with_teams(&["boston-celtics", "utah-jazz"]);
        let fetcher = StubFetcher::new([]);
        let err = build_contracts_table(&fetcher, &site, &NullProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::NoTeams { teams: 2 }));
    }

    #[tokio::test]
    async fn writes_contracts_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = IngestConfig::default().with_data_dir(DataDir::new(dir.path()));
        let site = site_with_teams(&["utah-jazz"]);
        let fetcher = StubFetcher::new([(
            site.team_url("utah-jazz"),
            team_page(&[("Walker Kessler", "$4,878,938")]),
        )]);

        run(&fetcher, &site, &config, &OutputOptions::default(), &NullProgress)
            .await
            .unwrap();

        let written = hoops_store::read_table(&config.data_dir.contracts_csv()).unwrap();
        assert_eq!(written.value(0, "Team"), Some("Utah Jazz"));
        assert_eq!(written.value(0, "2026-27"), Some(""));
    }
}
