//! Spotrac adapter.
//!
//! Team yearly salary tables become [`ContractRecord`]s; player contract
//! pages yield the cap exception the deal was signed under and the draft
//! line.

use std::sync::LazyLock;

use hoops_identity::{format_team, player_key};
use hoops_models::{ContractRecord, SalaryEntry, SeasonSalary, StatusToken};
use hoops_scraper::{HtmlTable, PageFetcher, ParseError, ScrapedRow, dom};
use regex::Regex;
use scraper::Html;
use serde::Deserialize;

use crate::SourceError;
use crate::site_def::SiteInfo;

/// Dollar amounts such as `$1,234,567` or `$1,234,567.89`.
static SALARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\d{1,3}(?:,\d{3})*(?:\.\d{2})?").expect("valid regex")
});

/// Spotrac site definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotracSite {
    /// Shared site fields.
    #[serde(flatten)]
    pub site: SiteInfo,
    /// Team slugs used in team page URLs.
    pub teams: Vec<String>,
    /// Team yearly salary page.
    pub team_contracts: TeamContractsPage,
    /// Player contract page.
    pub contract_detail: ContractDetailPage,
}

/// Where and how to read a team's yearly salary tables.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamContractsPage {
    /// URL template with `{base_url}` and `{team}`.
    pub url: String,
    /// Ids of the salary tables; any of them may be absent.
    pub table_ids: Vec<String>,
    /// Prefix identifying season header cells.
    pub season_prefix: String,
    /// Maximum number of seasons kept.
    pub max_seasons: usize,
    /// Rows with fewer cells are skipped.
    pub min_cells: usize,
}

/// Selectors on a player contract page.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractDetailPage {
    /// Label element whose next sibling holds the "Signed Using" value.
    pub signed_using_label: String,
    /// Element holding the draft line.
    pub drafted: String,
}

/// All player rows of one team page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamContracts {
    /// Season labels, in header order.
    pub seasons: Vec<String>,
    /// One record per player row.
    pub records: Vec<ContractRecord>,
}

/// Values read from a player contract page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractTerms {
    /// Cap exception used to sign the current deal.
    pub signed_using: Option<String>,
    /// Draft description.
    pub drafted: Option<String>,
}

impl SpotracSite {
    /// URL of a team's yearly salary page.
    #[must_use]
    pub fn team_url(&self, team: &str) -> String {
        self.site
            .expand(&self.team_contracts.url)
            .replace("{team}", team)
    }

    /// Parses a team's yearly salary page.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingElement`] if none of the configured
    /// tables is present.
    pub fn parse_team_contracts(
        &self,
        team: &str,
        html: &str,
    ) -> Result<TeamContracts, SourceError> {
        let page = &self.team_contracts;
        let document = Html::parse_document(html);

        let mut tables = Vec::new();
        for id in &page.table_ids {
            let table = HtmlTable::by_id(id)
                .with_header_selector("th")
                .with_min_cells(page.min_cells)
                .try_extract(&document)?;
            if let Some(table) = table {
                tables.push(table);
            }
        }

        let Some(first) = tables.first() else {
            return Err(ParseError::MissingElement {
                selector: page.table_ids.join(", "),
            }
            .into());
        };

        let seasons: Vec<String> = first
            .headers
            .iter()
            .filter(|h| h.starts_with(&page.season_prefix))
            .take(page.max_seasons)
            .cloned()
            .collect();

        let team_name = format_team(team);
        let team_url = self.team_url(team);
        let records: Vec<ContractRecord> = tables
            .iter()
            .flat_map(|t| &t.rows)
            .map(|row| self.contract_record(row, &seasons, &team_name, &team_url))
            .collect();

        log::debug!("{team}: {} player row(s), seasons {seasons:?}", records.len());
        Ok(TeamContracts { seasons, records })
    }

    fn contract_record(
        &self,
        row: &ScrapedRow,
        seasons: &[String],
        team_name: &str,
        team_url: &str,
    ) -> ContractRecord {
        let anchor = row.anchors.first();
        let name = anchor.map_or_else(|| "Unknown".to_owned(), |a| a.text.clone());
        let url = anchor.map(|a| self.site.absolute(&a.href)).unwrap_or_default();
        let cell = |i: usize| row.cells.get(i).cloned().unwrap_or_default();

        let mut entries: Vec<SalaryEntry> = row
            .cells
            .iter()
            .skip(3)
            .flat_map(|c| parse_salary_cell(c))
            .collect();
        entries.truncate(self.team_contracts.max_seasons);

        let salaries = seasons
            .iter()
            .enumerate()
            .map(|(i, season)| SeasonSalary {
                season: season.clone(),
                entry: entries.get(i).copied(),
            })
            .collect();

        ContractRecord {
            key: player_key(&name),
            name,
            url,
            team: team_name.to_owned(),
            team_url: team_url.to_owned(),
            position: cell(1),
            age: cell(2),
            salaries,
        }
    }

    /// Fetches and parses one team's yearly salary page.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the fetch fails or the page cannot be
    /// parsed.
    pub async fn fetch_team_contracts(
        &self,
        fetcher: &impl PageFetcher,
        team: &str,
    ) -> Result<TeamContracts, SourceError> {
        let html = fetcher.fetch_text(&self.team_url(team)).await?;
        self.parse_team_contracts(team, &html)
    }

    /// Parses a player contract page. Absent elements yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidSelector`] if a configured selector is
    /// malformed.
    pub fn parse_contract_detail(&self, html: &str) -> Result<ContractTerms, SourceError> {
        let document = Html::parse_document(html);
        let label_sel = dom::selector(&self.contract_detail.signed_using_label)?;

        let signed_using = document
            .select(&label_sel)
            .next()
            .and_then(dom::next_element_sibling)
            .map(dom::text_of);
        let drafted = dom::first_text(&document, &self.contract_detail.drafted)?;

        Ok(ContractTerms {
            signed_using,
            drafted,
        })
    }

    /// Fetches and parses a player contract page.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the fetch fails or a selector is invalid.
    pub async fn fetch_contract_detail(
        &self,
        fetcher: &impl PageFetcher,
        url: &str,
    ) -> Result<ContractTerms, SourceError> {
        let html = fetcher.fetch_text(url).await?;
        self.parse_contract_detail(&html)
    }
}

/// Parses one salary cell.
///
/// A cell mentioning `Two-Way`, `UFA` or `RFA` yields that token; otherwise
/// every dollar amount in the cell is returned.
#[must_use]
pub fn parse_salary_cell(text: &str) -> Vec<SalaryEntry> {
    for token in [StatusToken::TwoWay, StatusToken::Ufa, StatusToken::Rfa] {
        if text.contains(token.as_ref()) {
            return vec![SalaryEntry::Status(token)];
        }
    }

    SALARY_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SiteRegistry;
    use crate::ErrorClass;

    const TEAM_PAGE: &str = r#"
        <table id="dataTable-active">
          <thead><tr><th>Player (15)</th><th>Pos</th><th>Age</th>
            <th>2025-26</th><th>2026-27</th><th>2027-28</th></tr></thead>
          <tbody>
            <tr><td>
              <a href="https://www.spotrac.com/nba/player/_/id/1/ivica-zubac">Ivica Zubac</a>
            </td>
              <td>C</td><td>27</td><td>$18,102,000</td><td>$19,550,000</td><td>UFA</td></tr>
            <tr><td><a href="/nba/player/_/id/2/jordan-miller">Jordan Miller</a></td>
              <td>SF</td><td>25</td><td>Two-Way</td><td>-</td><td></td></tr>
            <tr><td>Totals</td></tr>
          </tbody>
        </table>
        <table id="dataTable-pending">
          <thead><tr><th>Player</th><th>Pos</th><th>Age</th><th>2025-26</th></tr></thead>
          <tbody>
            <tr><td><a href="/nba/player/_/id/3/bogdan">Bogdan Bogdanović</a></td>
              <td>SG</td><td>32</td><td>RFA</td></tr>
          </tbody>
        </table>
    "#;

    const PLAYER_PAGE: &str = r#"
        <div id="main"><section><article>
          <div class="row m-0 mt-0 pb-3"><div class="col-md-6"><div>
            <div><span>2017 1st Round (#32)</span></div>
          </div></div></div>
        </article></section></div>
        <div id="contracts"><div><div><div class="contract-wrapper mb-5">
          <div class="contract-details row m-0">
            <div><div class="label">Years</div><div>4</div></div>
            <div><div class="label">Value</div><div>$58M</div></div>
            <div><div class="label">AAV</div><div>$14.5M</div></div>
            <div><div class="label">GTD</div><div>$58M</div></div>
            <div><div class="label">Signed Using</div><div> Bird Rights </div></div>
          </div>
        </div></div></div></div>
    "#;

    fn site() -> SpotracSite {
        SiteRegistry::load().unwrap().spotrac
    }

    #[test]
    fn builds_team_url() {
        assert_eq!(
            site().team_url("la-clippers"),
            "https://www.spotrac.com/nba/la-clippers/yearly"
        );
    }

    #[test]
    fn parses_both_tables() {
        let contracts = site().parse_team_contracts("la-clippers", TEAM_PAGE).unwrap();
        assert_eq!(contracts.seasons, ["2025-26", "2026-27", "2027-28"]);
        assert_eq!(contracts.records.len(), 3);

        let zubac = &contracts.records[0];
        assert_eq!(zubac.team, "LA Clippers");
        assert_eq!(zubac.key.as_str(), "ivica-zubac");
        assert_eq!(zubac.position, "C");
        assert_eq!(zubac.age, "27");
        let cells: Vec<String> = zubac.to_row().split_off(7);
        assert_eq!(cells, ["$18102000", "$19550000", "UFA"]);

        let miller = &contracts.records[1];
        assert_eq!(miller.url, "https://www.spotrac.com/nba/player/_/id/2/jordan-miller");
        assert_eq!(
            miller.salaries[0].entry,
            Some(SalaryEntry::Status(StatusToken::TwoWay))
        );
        assert_eq!(miller.salaries[1].entry, None);

        assert_eq!(contracts.records[2].key.as_str(), "bogdan-bogdanovic");
    }

    #[test]
    fn missing_tables_are_structural() {
        let err = site()
            .parse_team_contracts("utah-jazz", "<table id=\"other\"><tr><th>x</th></tr></table>")
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Structural);
    }

    #[test]
    fn parses_salary_cells() {
        assert_eq!(
            parse_salary_cell("$1,234,567 $2,000.50"),
            vec![SalaryEntry::Amount(123_456_700), SalaryEntry::Amount(200_050)]
        );
        assert_eq!(
            parse_salary_cell("UFA 2027"),
            vec![SalaryEntry::Status(StatusToken::Ufa)]
        );
        assert!(parse_salary_cell("-").is_empty());
    }

    #[test]
    fn parses_contract_detail() {
        let terms = site().parse_contract_detail(PLAYER_PAGE).unwrap();
        assert_eq!(terms.signed_using.as_deref(), Some("Bird Rights"));
        assert_eq!(terms.drafted.as_deref(), Some("2017 1st Round (#32)"));
    }

    #[test]
    fn contract_detail_without_elements_is_empty() {
        let terms = site().parse_contract_detail("<html></html>").unwrap();
        assert_eq!(terms, ContractTerms::default());
    }
}
