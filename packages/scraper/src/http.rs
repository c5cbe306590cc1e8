//! `reqwest`-backed [`PageFetcher`].

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::retry::{self, RetryPolicy};
use crate::{FetchError, PageFetcher};

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches pages over HTTP, retrying per [`RetryPolicy`].
///
/// Only `200 OK` counts as success; any other status is retried like a
/// transport error.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    /// Builds a fetcher that sends `headers` (typically a browser-like
    /// `User-Agent`) with every request.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidHeader`] if a header name or value is
    /// not valid HTTP, or [`FetchError::Client`] if the client cannot be
    /// built.
    pub fn new(
        headers: &BTreeMap<String, String>,
        policy: RetryPolicy,
    ) -> Result<Self, FetchError> {
        let mut header_map = HeaderMap::new();
        for (key, value) in headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                FetchError::InvalidHeader {
                    name: key.clone(),
                    message: e.to_string(),
                }
            })?;
            let val = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
                name: key.clone(),
                message: e.to_string(),
            })?;
            header_map.insert(name, val);
        }

        let client = reqwest::Client::builder()
            .default_headers(header_map)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, policy })
    }

    /// Returns the retry policy in use.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn get_once(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_owned(),
            source,
        })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        retry::retry(&self.policy, url, |_| self.get_once(url)).await
    }
}
