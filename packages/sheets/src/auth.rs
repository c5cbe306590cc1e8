//! Service-account authentication.
//!
//! A signed RS256 assertion is exchanged at the key's `token_uri` for a
//! short-lived bearer token (the OAuth 2.0 JWT bearer grant).

use std::path::Path;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::SheetsError;

/// OAuth scope granting read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the assertion, in seconds.
const ASSERTION_TTL_SECS: i64 = 3600;

/// The fields of a service-account JSON key that are used here.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Account email, used as the issuer and in update stamps.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Token endpoint.
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

/// Claims of the token request assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    /// Issuer (the service account email).
    pub iss: String,
    /// Requested scope.
    pub scope: String,
    /// Audience (the token endpoint).
    pub aud: String,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccountKey {
    /// Parses a key from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Json`] if required fields are missing.
    pub fn from_json(json: &str) -> Result<Self, SheetsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a key file.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SheetsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SheetsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Claims for an assertion issued at `now` (seconds since the epoch).
    #[must_use]
    pub fn claims(&self, now: i64) -> Claims {
        Claims {
            iss: self.client_email.clone(),
            scope: SPREADSHEETS_SCOPE.to_owned(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        }
    }

    /// Signs the token request assertion.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Jwt`] if the private key is not a valid RSA
    /// PEM key.
    pub fn assertion(&self, now: i64) -> Result<String, SheetsError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(encode(&Header::new(Algorithm::RS256), &self.claims(now), &key)?)
    }

    /// Exchanges a fresh assertion for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if signing fails or the token endpoint
    /// rejects the request.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String, SheetsError> {
        let assertion = self.assertion(chrono::Utc::now().timestamp())?;
        log::debug!("Requesting access token for {}", self.client_email);

        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json::<TokenResponse>().await?.access_token)
    }
}
