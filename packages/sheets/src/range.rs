//! Spreadsheet ids and A1 ranges.

use std::sync::LazyLock;

use regex::Regex;

use crate::SheetsError;

static SPREADSHEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("valid regex"));

/// Extracts the spreadsheet id from a Google Sheets URL.
///
/// # Errors
///
/// Returns [`SheetsError::InvalidUrl`] if the URL has no
/// `/spreadsheets/d/<id>` segment.
pub fn spreadsheet_id_from_url(url: &str) -> Result<String, SheetsError> {
    SPREADSHEET_ID_RE
        .captures(url)
        .map(|c| c[1].to_owned())
        .ok_or_else(|| SheetsError::InvalidUrl {
            url: url.to_owned(),
        })
}

/// Builds an A1 range on `tab`, quoting the tab name.
///
/// `cells` is e.g. `A2` or `A:E`; `None` means the whole tab.
#[must_use]
pub fn a1(tab: &str, cells: Option<&str>) -> String {
    let quoted = format!("'{}'", tab.replace('\'', "''"));
    match cells {
        Some(cells) => format!("{quoted}!{cells}"),
        None => quoted,
    }
}
