#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Player, salary and contract records shared by the hoops pipelines.
//!
//! Every scraper produces these types (or a raw [`Table`] of site columns)
//! and every sink consumes them. Records are built fresh on each run and
//! never mutated after they are written out.

pub mod table;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub use table::{Table, TableError};

/// Column headers written to CSV files and spreadsheet tabs.
pub mod columns {
    /// Display name of the player.
    pub const PLAYER: &str = "Player";
    /// Display name column used by the positions listing.
    pub const NAME: &str = "Name";
    /// Absolute URL of the player's profile page.
    pub const PLAYER_LINK: &str = "Player Link";
    /// Normalized [`PlayerKey`](crate::PlayerKey).
    pub const PLAYER_KEY: &str = "Player Key";
    /// Team display name or abbreviation.
    pub const TEAM: &str = "Team";
    /// Absolute URL of the team page.
    pub const TEAM_LINK: &str = "Team Link";
    /// Roster position.
    pub const POSITION: &str = "Position";
    /// Player age.
    pub const AGE: &str = "Age";
    /// Cap exception the current contract was signed under.
    pub const SIGNED_USING: &str = "Signed Using";
    /// Draft description.
    pub const DRAFTED: &str = "Drafted";
    /// Fantasy points.
    pub const FP: &str = "FP";
    /// Fantasy points per game.
    pub const FPPG: &str = "FPPG";
    /// Fantasy points per minute.
    pub const FPPM: &str = "FPPM";
    /// Minutes per game.
    pub const MPG: &str = "MPG";
    /// Composite fantasy rating.
    pub const FPR: &str = "FPR";

    /// Derived metric columns appended to the season totals table, in order.
    pub const METRICS: [&str; 5] = [FP, FPPG, FPPM, MPG, FPR];

    /// Stat columns coerced to numbers before metrics are computed.
    pub const DEFAULT_NUMERIC: [&str; 9] =
        ["PTS", "TRB", "AST", "STL", "BLK", "TOV", "PF", "G", "MP"];
}

/// Canonical cross-source identifier derived from a display name.
///
/// Only constructed by the key normalizer, so two differently formatted
/// scrapes of the same person compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerKey(String);

impl PlayerKey {
    /// Wraps a string that has already been through the key normalizer.
    #[must_use]
    pub const fn from_normalized(key: String) -> Self {
        Self(key)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Season counting stats for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatTotals {
    /// Points.
    pub pts: f64,
    /// Total rebounds.
    pub trb: f64,
    /// Assists.
    pub ast: f64,
    /// Steals.
    pub stl: f64,
    /// Blocks.
    pub blk: f64,
    /// Turnovers.
    pub tov: f64,
    /// Personal fouls.
    pub pf: f64,
    /// Games played.
    pub g: f64,
    /// Minutes played.
    pub mp: f64,
}

/// Fantasy metrics derived from [`StatTotals`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FantasyMetrics {
    /// Fantasy points, truncated toward zero.
    pub fp: i64,
    /// Fantasy points per game, one decimal.
    pub fppg: f64,
    /// Fantasy points per minute, two decimals.
    pub fppm: f64,
    /// Minutes per game, one decimal.
    pub mpg: f64,
    /// Composite rating `FP² / (G × MP)`, one decimal.
    pub fpr: f64,
}

impl FantasyMetrics {
    /// Formats the metrics as CSV cells in [`columns::METRICS`] order.
    #[must_use]
    pub fn to_cells(&self) -> [String; 5] {
        [
            self.fp.to_string(),
            format!("{:.1}", self.fppg),
            format!("{:.2}", self.fppm),
            format!("{:.1}", self.mpg),
            format!("{:.1}", self.fpr),
        ]
    }
}

/// One row of a season totals table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Display name as shown on the site.
    pub name: String,
    /// Absolute profile URL, when the row links to one.
    pub url: Option<String>,
    /// Normalized key.
    pub key: PlayerKey,
    /// Team abbreviation (`2TM`/`3TM` for multi-team totals).
    pub team: String,
    /// Absolute team URL, when the row links to one.
    pub team_url: Option<String>,
    /// Listed position.
    pub position: String,
    /// Age during the season.
    pub age: Option<u32>,
    /// Counting stats.
    pub totals: StatTotals,
}

/// A contract status that takes the place of a dollar figure.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum StatusToken {
    /// Two-way contract.
    #[strum(serialize = "Two-Way")]
    #[serde(rename = "Two-Way")]
    TwoWay,
    /// Unrestricted free agent.
    #[strum(serialize = "UFA")]
    #[serde(rename = "UFA")]
    Ufa,
    /// Restricted free agent.
    #[strum(serialize = "RFA")]
    #[serde(rename = "RFA")]
    Rfa,
}

/// A single season's salary cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalaryEntry {
    /// Dollar amount, stored in cents.
    Amount(u64),
    /// Status token instead of an amount.
    Status(StatusToken),
}

/// Error returned when a salary cell cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid salary value: {0:?}")]
pub struct InvalidSalary(pub String);

impl FromStr for SalaryEntry {
    type Err = InvalidSalary;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(token) = trimmed.parse::<StatusToken>() {
            return Ok(Self::Status(token));
        }

        let invalid = || InvalidSalary(s.to_owned());
        let digits: String = trimmed
            .strip_prefix('$')
            .ok_or_else(invalid)?
            .chars()
            .filter(|c| *c != ',')
            .collect();

        let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        if whole.is_empty() || frac.len() > 2 {
            return Err(invalid());
        }
        let dollars: u64 = whole.parse().map_err(|_| invalid())?;
        let cents: u64 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<2}").parse().map_err(|_| invalid())?
        };

        dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .map(Self::Amount)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for SalaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(cents) if cents % 100 == 0 => write!(f, "${}", cents / 100),
            Self::Amount(cents) => write!(f, "${}.{:02}", cents / 100, cents % 100),
            Self::Status(token) => f.write_str(token.as_ref()),
        }
    }
}

/// Salary for one season column of a team's yearly table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonSalary {
    /// Season label from the table header (e.g. `2025-26`).
    pub season: String,
    /// Parsed cell, or `None` when the cell was blank or padded.
    pub entry: Option<SalaryEntry>,
}

/// One player row of a team's yearly salary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRecord {
    /// Display name.
    pub name: String,
    /// Absolute profile URL.
    pub url: String,
    /// Normalized key.
    pub key: PlayerKey,
    /// Formatted team name (e.g. `LA Clippers`).
    pub team: String,
    /// Team yearly salary page.
    pub team_url: String,
    /// Listed position.
    pub position: String,
    /// Listed age, as printed.
    pub age: String,
    /// Per-season salary cells, in header order.
    pub salaries: Vec<SeasonSalary>,
}

impl ContractRecord {
    /// Returns the header row for a contracts table with the given seasons.
    #[must_use]
    pub fn headers(seasons: &[String]) -> Vec<String> {
        [
            columns::PLAYER,
            columns::PLAYER_LINK,
            columns::PLAYER_KEY,
            columns::TEAM,
            columns::TEAM_LINK,
            columns::POSITION,
            columns::AGE,
        ]
        .iter()
        .map(|h| (*h).to_owned())
        .chain(seasons.iter().cloned())
        .collect()
    }

    /// Returns the record as a row matching [`ContractRecord::headers`].
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        [
            self.name.clone(),
            self.url.clone(),
            self.key.to_string(),
            self.team.clone(),
            self.team_url.clone(),
            self.position.clone(),
            self.age.clone(),
        ]
        .into_iter()
        .chain(
            self.salaries
                .iter()
                .map(|s| s.entry.map(|e| e.to_string()).unwrap_or_default()),
        )
        .collect()
    }
}

/// Contract type details scraped from a player's contract page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDetail {
    /// Display name.
    pub name: String,
    /// Absolute profile URL.
    pub url: String,
    /// Normalized key.
    pub key: PlayerKey,
    /// Cap exception used to sign the current deal.
    pub signed_using: Option<String>,
    /// Draft description.
    pub drafted: Option<String>,
}

impl ContractDetail {
    /// Header row for the contract types table.
    pub const HEADERS: [&str; 5] = [
        columns::PLAYER,
        columns::PLAYER_LINK,
        columns::PLAYER_KEY,
        columns::SIGNED_USING,
        columns::DRAFTED,
    ];

    /// Returns the record as a row matching [`ContractDetail::HEADERS`].
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.url.clone(),
            self.key.to_string(),
            self.signed_using.clone().unwrap_or_default(),
            self.drafted.clone().unwrap_or_default(),
        ]
    }
}

/// A player's team and position from a roster listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRecord {
    /// Display name.
    pub name: String,
    /// Absolute profile URL.
    pub url: String,
    /// Normalized key.
    pub key: PlayerKey,
    /// Team abbreviation.
    pub team: String,
    /// Position abbreviation.
    pub position: String,
}

impl PositionRecord {
    /// Header row for the positions table.
    pub const HEADERS: [&str; 5] = [
        columns::NAME,
        columns::PLAYER_LINK,
        columns::PLAYER_KEY,
        columns::TEAM,
        columns::POSITION,
    ];

    /// Returns the record as a row matching [`PositionRecord::HEADERS`].
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.url.clone(),
            self.key.to_string(),
            self.team.clone(),
            self.position.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_salary_amounts() {
        assert_eq!(
            "$12,345,678".parse::<SalaryEntry>(),
            Ok(SalaryEntry::Amount(1_234_567_800))
        );
        assert_eq!(
            "$1,119,563.5".parse::<SalaryEntry>(),
            Ok(SalaryEntry::Amount(111_956_350))
        );
    }

    #[test]
    fn parses_status_tokens() {
        assert_eq!(
            "Two-Way".parse::<SalaryEntry>(),
            Ok(SalaryEntry::Status(StatusToken::TwoWay))
        );
        assert_eq!(
            " UFA ".parse::<SalaryEntry>(),
            Ok(SalaryEntry::Status(StatusToken::Ufa))
        );
    }

    #[test]
    fn rejects_unrecognized_salary_text() {
        assert!("-".parse::<SalaryEntry>().is_err());
        assert!("$".parse::<SalaryEntry>().is_err());
        assert!("12,000".parse::<SalaryEntry>().is_err());
        assert!("$1.234".parse::<SalaryEntry>().is_err());
    }

    #[test]
    fn displays_salary_without_commas() {
        assert_eq!(SalaryEntry::Amount(1_234_567_800).to_string(), "$12345678");
        assert_eq!(SalaryEntry::Amount(105).to_string(), "$1.05");
        assert_eq!(SalaryEntry::Status(StatusToken::Rfa).to_string(), "RFA");
    }

    #[test]
    fn contract_row_matches_headers() {
        let seasons = vec!["2025-26".to_owned(), "2026-27".to_owned()];
        let record = ContractRecord {
            name: "Jalen Brunson".to_owned(),
            url: "https://www.spotrac.com/nba/player/_/id/1".to_owned(),
            key: PlayerKey::from_normalized("jalen-brunson".to_owned()),
            team: "New York Knicks".to_owned(),
            team_url: "https://www.spotrac.com/nba/new-york-knicks/yearly".to_owned(),
            position: "PG".to_owned(),
            age: "28".to_owned(),
            salaries: vec![
                SeasonSalary {
                    season: seasons[0].clone(),
                    entry: Some(SalaryEntry::Amount(2_499_000_000)),
                },
                SeasonSalary {
                    season: seasons[1].clone(),
                    entry: None,
                },
            ],
        };

        let headers = ContractRecord::headers(&seasons);
        let row = record.to_row();
        assert_eq!(headers.len(), row.len());
        assert_eq!(row[2], "jalen-brunson");
        assert_eq!(row[7], "$24990000");
        assert_eq!(row[8], "");
    }

    #[test]
    fn metrics_cells_use_fixed_precision() {
        let metrics = FantasyMetrics {
            fp: 820,
            fppg: 16.4,
            fppm: 0.55,
            mpg: 30.0,
            fpr: 9.0,
        };
        assert_eq!(metrics.to_cells(), ["820", "16.4", "0.55", "30.0", "9.0"]);
    }
}
