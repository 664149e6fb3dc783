//! Service account authentication for the Google Sheets API.
//!
//! A signed JWT assertion is exchanged for a short-lived access token at the key's token URI. The
//! key is read from the configured JSON key file or, when that file does not exist, from the
//! `GOOGLE_SERVICE_ACCOUNT_EMAIL` and `GOOGLE_PRIVATE_KEY` environment variables.

use crate::api::SPREADSHEETS_SCOPE;
use crate::{utils, Config, Result};
use anyhow::{bail, Context};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const EMAIL_ENV: &str = "GOOGLE_SERVICE_ACCOUNT_EMAIL";
const PRIVATE_KEY_ENV: &str = "GOOGLE_PRIVATE_KEY";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// The fields of a downloaded service account key that we need.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub(super) struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    async fn load(path: &Path) -> Result<Self> {
        let mut key: Self = utils::deserialize(path).await?;
        key.private_key = parse_private_key(&key.private_key);
        Ok(key)
    }

    fn from_env() -> Result<Self> {
        let missing = |name: &str| format!("No service account key file and {name} is not set");
        let client_email = std::env::var(EMAIL_ENV).with_context(|| missing(EMAIL_ENV))?;
        let raw_key = std::env::var(PRIVATE_KEY_ENV).with_context(|| missing(PRIVATE_KEY_ENV))?;
        Ok(Self {
            client_email,
            private_key: parse_private_key(&raw_key),
            token_uri: default_token_uri(),
        })
    }

    /// Loads the key file configured in `config`, falling back to the environment.
    async fn resolve(config: &Config) -> Result<Self> {
        let path = config.service_account_path();
        if path.is_file() {
            debug!("Using the service account key at {}", path.display());
            Self::load(&path).await
        } else {
            debug!("Using the service account from the environment");
            Self::from_env()
        }
    }

    /// Signs the assertion that is exchanged for an access token.
    fn assertion(&self, issued_at: i64) -> Result<String> {
        let claims = Claims {
            iss: &self.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .context("The service account private key is not a valid RSA PEM key")?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .context("Unable to sign the service account assertion")
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Obtains an access token for the service account configured in `config`.
pub(super) async fn access_token(config: &Config) -> Result<String> {
    let key = ServiceAccountKey::resolve(config).await?;
    let assertion = key.assertion(chrono::Utc::now().timestamp())?;

    let response = reqwest::Client::new()
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
        .send()
        .await
        .context("Failed to send the token request")?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        bail!("The token request failed with status {status}: {body}");
    }

    let token: TokenResponse = response
        .json()
        .await
        .context("Failed to parse the token response")?;
    debug!("Obtained an access token for {}", key.client_email);
    Ok(token.access_token)
}

/// Private keys pasted into environment variables often carry literal `\n` sequences, sometimes
/// escaped twice. These are turned back into newlines.
pub(super) fn parse_private_key(raw: &str) -> String {
    raw.trim_matches('"')
        .replace("\\\\n", "\n")
        .replace("\\n", "\n")
}
