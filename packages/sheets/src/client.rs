//! Sheets API v4 client.

use hoops_models::Table;
use reqwest::{RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::auth::ServiceAccountKey;
use crate::range::{a1, spreadsheet_id_from_url};
use crate::{SheetsError, SheetsSettings, last_updated_stamp};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Format of the timestamp in update stamps.
const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a table is published to its tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// Cells to clear first, e.g. `A:E`. `None` clears the whole tab.
    pub clear_range: Option<String>,
    /// Pipeline name for the `A1` update stamp. `None` writes no stamp.
    pub stamp_origin: Option<String>,
}

impl PublishOptions {
    /// Clears only `range` before writing.
    #[must_use]
    pub fn with_clear_range(mut self, range: impl Into<String>) -> Self {
        self.clear_range = Some(range.into());
        self
    }

    /// Writes an update stamp naming `origin` in `A1`.
    #[must_use]
    pub fn with_stamp(mut self, origin: impl Into<String>) -> Self {
        self.stamp_origin = Some(origin.into());
        self
    }

    /// Cell where the table's header row goes.
    #[must_use]
    pub const fn start_cell(&self) -> &'static str {
        if self.stamp_origin.is_some() { "A2" } else { "A1" }
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// An authenticated handle on one spreadsheet.
#[derive(Debug)]
pub struct SheetsClient {
    http: reqwest::Client,
    token: String,
    spreadsheet_id: String,
    client_email: String,
}

impl SheetsClient {
    /// Reads the key, obtains a bearer token and resolves the spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the key cannot be read, authentication
    /// fails, or the URL is not a spreadsheet URL.
    pub async fn connect(settings: &SheetsSettings) -> Result<Self, SheetsError> {
        let spreadsheet_id = spreadsheet_id_from_url(&settings.spreadsheet_url)?;
        let key = ServiceAccountKey::from_file(&settings.credentials_path)?;
        let http = reqwest::Client::new();
        let token = key.access_token(&http).await?;

        log::info!("Connected to spreadsheet {spreadsheet_id} as {}", key.client_email);
        Ok(Self {
            http,
            token,
            spreadsheet_id,
            client_email: key.client_email,
        })
    }

    fn stamp(&self, timestamp: &str, origin: &str) -> String {
        last_updated_stamp(timestamp, &self.client_email, origin)
    }

    fn url(&self, segments: &[&str]) -> Result<Url, SheetsError> {
        let invalid = || SheetsError::InvalidUrl {
            url: API_BASE.to_owned(),
        };
        let mut url = Url::parse(API_BASE).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SheetsError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(SheetsError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SheetsError> {
        Ok(self.send(request).await?.json().await?)
    }

    /// Titles of every tab, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the request fails.
    pub async fn tab_titles(&self) -> Result<Vec<String>, SheetsError> {
        let request = self
            .http
            .get(self.url(&[])?)
            .query(&[("fields", "sheets.properties.title")]);
        let meta: SpreadsheetMeta = self.send_json(request).await?;
        Ok(titles(meta))
    }

    /// Fails unless a tab named `tab` exists.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::TabNotFound`] if there is no such tab.
    pub async fn ensure_tab(&self, tab: &str) -> Result<(), SheetsError> {
        if self.tab_titles().await?.iter().any(|t| t == tab) {
            Ok(())
        } else {
            Err(SheetsError::TabNotFound {
                tab: tab.to_owned(),
            })
        }
    }

    /// Clears `cells` of `tab`, or the whole tab when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the request fails.
    pub async fn clear(&self, tab: &str, cells: Option<&str>) -> Result<(), SheetsError> {
        let range = a1(tab, cells);
        log::debug!("Clearing {range}");
        let request = self
            .http
            .post(self.url(&["values", &format!("{range}:clear")])?)
            .json(&serde_json::json!({}));
        self.send(request).await?;
        Ok(())
    }

    /// Writes rows starting at `start_cell`. Values are interpreted as if
    /// typed by a user, so numbers stay numbers.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the request fails.
    pub async fn write(
        &self,
        tab: &str,
        start_cell: &str,
        values: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        let range = a1(tab, Some(start_cell));
        log::debug!("Writing {} row(s) at {range}", values.len());
        let request = self
            .http
            .put(self.url(&["values", &range])?)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&serde_json::json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": values,
            }));
        self.send(request).await?;
        Ok(())
    }

    /// Reads every populated row of `tab`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the request fails.
    pub async fn read(&self, tab: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let request = self.http.get(self.url(&["values", &a1(tab, None)])?);
        let range: ValueRange = self.send_json(request).await?;
        Ok(range.values)
    }

    /// Replaces the contents of `tab` with `table`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::TabNotFound`] if the tab does not exist, or
    /// another [`SheetsError`] if a request fails.
    pub async fn publish_table(
        &self,
        tab: &str,
        table: &Table,
        options: &PublishOptions,
    ) -> Result<(), SheetsError> {
        self.ensure_tab(tab).await?;
        self.clear(tab, options.clear_range.as_deref()).await?;

        if let Some(origin) = &options.stamp_origin {
            let timestamp = chrono::Local::now().format(STAMP_FORMAT).to_string();
            self.write(tab, "A1", &[vec![self.stamp(&timestamp, origin)]])
                .await?;
        }

        self.write(tab, options.start_cell(), &table.to_values())
            .await?;
        log::info!("Published {} row(s) to sheet '{tab}'", table.len());
        Ok(())
    }
}

fn titles(meta: SpreadsheetMeta) -> Vec<String> {
    meta.sheets
        .into_iter()
        .map(|s| s.properties.title)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_moves_table_down() {
        assert_eq!(PublishOptions::default().start_cell(), "A1");
        assert_eq!(PublishOptions::default().with_stamp("stats").start_cell(), "A2");
    }

    #[test]
    fn clear_range_is_optional() {
        let options = PublishOptions::default().with_clear_range("A:E");
        assert_eq!(options.clear_range.as_deref(), Some("A:E"));
        assert_eq!(options.stamp_origin, None);
    }

    #[test]
    fn stamp_names_the_service_account() {
        let client = SheetsClient {
            http: reqwest::Client::new(),
            token: "token".to_owned(),
            spreadsheet_id: "abc".to_owned(),
            client_email: "bot@hoops.iam.gserviceaccount.com".to_owned(),
        };
        assert_eq!(
            client.stamp("2025-04-11 02:13:00", "positions"),
            "Last updated 2025-04-11 02:13:00 by bot@hoops.iam.gserviceaccount.com from positions"
        );
    }

    #[test]
    fn reads_tab_titles_from_metadata() {
        let meta: SpreadsheetMeta = serde_json::from_str(
            r#"{"sheets": [{"properties": {"title": "Stats"}},
                           {"properties": {"title": "Contract Types"}}]}"#,
        )
        .unwrap();
        assert_eq!(titles(meta), ["Stats", "Contract Types"]);
    }

    #[test]
    fn empty_value_range_has_no_rows() {
        let range: ValueRange = serde_json::from_str(r#"{"range": "'Stats'!A1:Z1000"}"#).unwrap();
        assert!(range.values.is_empty());
    }
}
