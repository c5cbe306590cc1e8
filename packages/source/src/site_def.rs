//! Fields shared by every site definition.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::SourceError;

/// Identity, base URL and request headers of one upstream site.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteInfo {
    /// Short identifier (e.g. `bbref`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Scheme and host, without a trailing slash.
    pub base_url: String,
    /// Headers sent with every request (notably `User-Agent`).
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl SiteInfo {
    /// Substitutes `{base_url}` in a URL template.
    #[must_use]
    pub fn expand(&self, template: &str) -> String {
        template.replace("{base_url}", self.base_url.trim_end_matches('/'))
    }

    /// Resolves an `href` against the site's base URL.
    #[must_use]
    pub fn absolute(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_owned();
        }
        let base = self.base_url.trim_end_matches('/');
        if href.starts_with('/') {
            format!("{base}{href}")
        } else {
            format!("{base}/{href}")
        }
    }
}

/// Parses a site definition from TOML.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or does not
/// match `T`.
pub fn parse_site_toml<T: DeserializeOwned>(site: &str, toml_str: &str) -> Result<T, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        site: site.to_owned(),
        message: e.to_string(),
    })
}
