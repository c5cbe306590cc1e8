//! Sports.ws adapter: player team and position listing.

use std::sync::LazyLock;

use hoops_identity::player_key;
use hoops_models::PositionRecord;
use hoops_scraper::{PageFetcher, ParseError, dom};
use regex::Regex;
use scraper::Html;
use serde::Deserialize;

use crate::SourceError;
use crate::site_def::SiteInfo;

/// `, TEAM, POS` following a player link.
static TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\w*]+),\s*(\w+)").expect("valid regex"));

/// Sports.ws site definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SportsWsSite {
    /// Shared site fields.
    #[serde(flatten)]
    pub site: SiteInfo,
    /// Player stats listing.
    pub positions: PositionsPage,
}

/// Where and how to read the player listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsPage {
    /// URL template with `{base_url}`.
    pub url: String,
    /// Selector for player links.
    pub link_selector: String,
    /// Prefix removed from the profile URL before deriving the key.
    pub player_path_prefix: String,
    /// Names that mark filler rows.
    #[serde(default)]
    pub excluded_names: Vec<String>,
}

impl SportsWsSite {
    /// URL of the player listing.
    #[must_use]
    pub fn positions_url(&self) -> String {
        self.site.expand(&self.positions.url)
    }

    /// Parses the player listing.
    ///
    /// The key is derived from the profile URL slug rather than the display
    /// name. Team and position come from the text right after the link and
    /// are empty when it does not match `, TEAM, POS`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingElement`] if no player links are found.
    pub fn parse_positions(&self, html: &str) -> Result<Vec<PositionRecord>, SourceError> {
        let document = Html::parse_document(html);
        let sel = dom::selector(&self.positions.link_selector)?;
        let prefix = self.site.expand(&self.positions.player_path_prefix);

        let mut links = 0usize;
        let mut records = Vec::new();
        for anchor in document.select(&sel) {
            links += 1;
            let name = dom::text_of(anchor);
            if self.positions.excluded_names.iter().any(|n| *n == name) {
                continue;
            }

            let href = anchor.value().attr("href").unwrap_or_default();
            let url = self.site.absolute(href);
            let slug = url.strip_prefix(&prefix).unwrap_or(&url);
            let tail = dom::tail_text(anchor).unwrap_or_default();
            let (team, position) = TAIL_RE
                .captures(&tail)
                .map(|c| (c[1].to_owned(), c[2].to_owned()))
                .unwrap_or_default();

            records.push(PositionRecord {
                key: player_key(slug),
                name,
                url,
                team,
                position,
            });
        }

        if links == 0 {
            return Err(ParseError::MissingElement {
                selector: self.positions.link_selector.clone(),
            }
            .into());
        }

        log::debug!("{}: {} player(s) from {links} link(s)", self.site.id, records.len());
        Ok(records)
    }

    /// Fetches and parses the player listing.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the fetch fails or no player links are
    /// found.
    pub async fn fetch_positions(
        &self,
        fetcher: &impl PageFetcher,
    ) -> Result<Vec<PositionRecord>, SourceError> {
        let url = self.positions_url();
        log::info!("Fetching {} positions: {url}", self.site.name);
        let html = fetcher.fetch_text(&url).await?;
        self.parse_positions(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorClass;
    use crate::registry::SiteRegistry;

    const LISTING: &str = r#"
        <table><tbody>
          <tr><td><a href="/nba/nikola-jokic">Nikola Jokić</a>, DEN, C</td><td>60.1</td></tr>
          <tr>
            <td><a href="/nba/shai-gilgeous-alexander">Shai Gilgeous-Alexander</a>, OKC*, PG</td>
            <td>55.0</td>
          </tr>
          <tr><td><a href="/nba/free-agent">Free Agent</a></td><td>1.0</td></tr>
          <tr><td><a href="/nba/filler">.</a>, , </td><td></td></tr>
          <tr><td>no link</td><td><a href="/nba/second-column">Second</a></td></tr>
        </tbody></table>
    "#;

    fn site() -> SportsWsSite {
        SiteRegistry::load().unwrap().sportsws
    }

    #[test]
    fn parses_listing() {
        let records = site().parse_positions(LISTING).unwrap();
        assert_eq!(records.len(), 3);

        let jokic = &records[0];
        assert_eq!(jokic.name, "Nikola Jokić");
        assert_eq!(jokic.url, "https://sports.ws/nba/nikola-jokic");
        assert_eq!(jokic.key.as_str(), "nikola-jokic");
        assert_eq!(jokic.team, "DEN");
        assert_eq!(jokic.position, "C");

        assert_eq!(records[1].team, "OKC*");
        assert_eq!(records[1].position, "PG");
    }

    #[test]
    fn missing_tail_leaves_team_empty() {
        let records = site().parse_positions(LISTING).unwrap();
        let free_agent = &records[2];
        assert_eq!(free_agent.team, "");
        assert_eq!(free_agent.position, "");
    }

    #[test]
    fn page_without_links_is_structural() {
        let err = site().parse_positions("<table><tr><td>x</td></tr></table>").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Structural);
    }
}
