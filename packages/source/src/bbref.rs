//! Basketball-Reference adapter.
//!
//! Parses the league season totals table and the "Site Last Updated"
//! notice on the home page.

use hoops_models::{Table, columns};
use hoops_scraper::{HtmlTable, PageFetcher, ParseError, dom};
use scraper::Html;
use serde::Deserialize;

use crate::SourceError;
use crate::site_def::SiteInfo;

/// Basketball-Reference site definition.
#[derive(Debug, Clone, Deserialize)]
pub struct BbrefSite {
    /// Shared site fields.
    #[serde(flatten)]
    pub site: SiteInfo,
    /// Season totals page.
    pub totals: TotalsPage,
    /// Home page update notice.
    pub status: StatusPage,
}

/// Where and how to read the season totals table.
#[derive(Debug, Clone, Deserialize)]
pub struct TotalsPage {
    /// URL template with `{base_url}` and `{year}`.
    pub url: String,
    /// Table element id.
    pub table_id: String,
    /// Leading header cells without a matching `<td>` (the rank column).
    #[serde(default)]
    pub skip_header_cells: usize,
    /// Substring identifying player profile links.
    pub player_href_marker: String,
    /// Substring identifying team links.
    pub team_href_marker: String,
    /// `Player` values that are summary rows rather than players.
    #[serde(default)]
    pub excluded_players: Vec<String>,
}

/// Where to read the site update notice.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusPage {
    /// URL template with `{base_url}`.
    pub url: String,
    /// Selector matching the candidate paragraphs.
    pub selector: String,
    /// Zero-based index of the paragraph holding the notice.
    pub index: usize,
    /// Label text stripped from the notice.
    pub label: String,
}

impl BbrefSite {
    /// URL of the season totals page for the season ending in `year`.
    #[must_use]
    pub fn totals_url(&self, year: u16) -> String {
        self.site
            .expand(&self.totals.url)
            .replace("{year}", &year.to_string())
    }

    /// Parses the season totals table.
    ///
    /// Returns the site's columns followed by `Player Link` and `Team Link`.
    /// Summary rows and rows without a player name are dropped.
    ///
    /// # Errors
    ///
    /// Returns a structural [`SourceError`] if the table or its `Player`
    /// column is missing.
    pub fn parse_totals(&self, html: &str) -> Result<Table, SourceError> {
        let scraped = HtmlTable::by_id(&self.totals.table_id)
            .with_skipped_header_cells(self.totals.skip_header_cells)
            .parse(html)?;

        let width = scraped.headers.len();
        let mut table = Table::new(
            scraped
                .headers
                .iter()
                .map(String::as_str)
                .chain([columns::PLAYER_LINK, columns::TEAM_LINK]),
        );
        let player_col = table.require_column(columns::PLAYER)?;

        let mut dropped = 0usize;
        for row in &scraped.rows {
            let player = row.cells.get(player_col).map_or("", |s| s.trim());
            if player.is_empty() || self.totals.excluded_players.iter().any(|p| p == player) {
                dropped += 1;
                continue;
            }

            let link = |marker: &str| {
                row.anchor_containing(marker)
                    .map(|a| self.site.absolute(&a.href))
                    .unwrap_or_default()
            };

            let mut cells = row.cells.clone();
            cells.resize(width, String::new());
            cells.push(link(&self.totals.player_href_marker));
            cells.push(link(&self.totals.team_href_marker));
            table.push_row(cells);
        }

        log::debug!(
            "{}: parsed {} totals row(s), dropped {dropped}",
            self.site.id,
            table.len()
        );
        Ok(table)
    }

    /// Fetches and parses the season totals for `year`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the fetch fails or the page cannot be
    /// parsed.
    pub async fn fetch_totals(
        &self,
        fetcher: &impl PageFetcher,
        year: u16,
    ) -> Result<Table, SourceError> {
        let url = self.totals_url(year);
        log::info!("Fetching {} season totals for {year}: {url}", self.site.name);
        let html = fetcher.fetch_text(&url).await?;
        self.parse_totals(&html)
    }

    /// Extracts the "Site Last Updated" value from the home page.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingElement`] if the notice paragraph is
    /// absent.
    pub fn parse_site_updated(&self, html: &str) -> Result<String, SourceError> {
        let document = Html::parse_document(html);
        let sel = dom::selector(&self.status.selector)?;
        let paragraph = document
            .select(&sel)
            .nth(self.status.index)
            .ok_or_else(|| ParseError::MissingElement {
                selector: format!("{} (#{})", self.status.selector, self.status.index),
            })?;

        Ok(dom::text_of(paragraph)
            .replace(&self.status.label, "")
            .trim()
            .to_owned())
    }

    /// Fetches the home page and returns the update notice.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the fetch fails or the notice is absent.
    pub async fn fetch_site_updated(
        &self,
        fetcher: &impl PageFetcher,
    ) -> Result<String, SourceError> {
        let html = fetcher.fetch_text(&self.site.expand(&self.status.url)).await?;
        self.parse_site_updated(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorClass;
    use crate::registry::SiteRegistry;
    use crate::test_support::StubFetcher;

    const TOTALS: &str = r#"
        <html><body>
        <table id="totals_stats">
          <thead><tr>
            <th>Rk</th><th>Player</th><th>Age</th><th>Team</th>
            <th>Pos</th><th>G</th><th>MP</th><th>PTS</th>
          </tr></thead>
          <tbody>
            <tr><th>1</th>
              <td><a href="/players/j/jamesle01.html">LeBron James</a></td><td>40</td>
              <td><a href="/teams/LAL/2025.html">LAL</a></td>
              <td>SF</td><td>70</td><td>2444</td><td>1708</td></tr>
            <tr class="thead"><th>Rk</th><th>Player</th><th>Age</th><th>Team</th>
              <th>Pos</th><th>G</th><th>MP</th><th>PTS</th></tr>
            <tr><th>2</th>
              <td><a href="/players/d/doncilu01.html">Luka Dončić</a></td><td>25</td>
              <td>2TM</td><td>PG</td><td>50</td><td>1700</td><td>1400</td></tr>
            <tr><th></th><td>League Average</td><td>27</td><td></td><td></td>
              <td>40</td><td>900</td><td>400</td></tr>
            <tr><th>3</th><td></td><td></td><td></td><td></td><td></td><td></td><td></td></tr>
          </tbody>
        </table>
        <div id="social">
          <p>Follow us</p><p>Site Last Updated: Friday, April 11, 2:13AM</p>
        </div>
        </body></html>
    "#;

    fn site() -> BbrefSite {
        SiteRegistry::load().unwrap().bbref
    }

    #[test]
    fn builds_totals_url() {
        assert_eq!(
            site().totals_url(2025),
            "https://www.basketball-reference.com/leagues/NBA_2025_totals.html"
        );
    }

    #[test]
    fn parses_totals_with_links() {
        let table = site().parse_totals(TOTALS).unwrap();

        assert_eq!(
            table.headers(),
            ["Player", "Age", "Team", "Pos", "G", "MP", "PTS", "Player Link", "Team Link"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.value(0, "Player Link"),
            Some("https://www.basketball-reference.com/players/j/jamesle01.html")
        );
        assert_eq!(
            table.value(0, "Team Link"),
            Some("https://www.basketball-reference.com/teams/LAL/2025.html")
        );
        assert_eq!(table.value(1, "Player"), Some("Luka Dončić"));
        assert_eq!(table.value(1, "Team Link"), Some(""));
    }

    #[test]
    fn missing_totals_table_is_structural() {
        let err = site().parse_totals("<html><table id=\"other\"></table></html>").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Structural);
    }

    #[test]
    fn reads_site_updated_notice() {
        assert_eq!(
            site().parse_site_updated(TOTALS).unwrap(),
            "Friday, April 11, 2:13AM"
        );
    }

    #[test]
    fn missing_notice_is_structural() {
        let err = site().parse_site_updated("<div id=\"social\"><p>only</p></div>").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Structural);
    }

    #[tokio::test]
    async fn fetches_totals_through_fetcher() {
        let site = site();
        let fetcher = StubFetcher::new([(site.totals_url(2024), TOTALS.to_owned())]);
        let table = site.fetch_totals(&fetcher, 2024).await.unwrap();
        assert_eq!(table.len(), 2);

        let err = site.fetch_totals(&fetcher, 2023).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Transient);
    }
}
