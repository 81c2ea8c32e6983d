//! OAuth2 bearer tokens minted from the service-account key.
//!
//! The two-legged flow: sign a short-lived RS256 JWT assertion with the
//! account's private key, exchange it at the token endpoint for an access
//! token, and cache that until shortly before it expires. Both REST clients
//! share one `TokenMinter`.

use chrono::{DateTime, Duration, Utc};
use common::model::credentials::ServiceAccount;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

const SCOPES: &str =
    "https://www.googleapis.com/auth/datastore https://www.googleapis.com/auth/identitytoolkit";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_SLACK_SECS: i64 = 60;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid service-account key: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),
    #[error("token endpoint unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token request rejected: {0}")]
    Denied(String),
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct TokenMinter {
    account: ServiceAccount,
    http: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenMinter {
    pub fn new(account: ServiceAccount, http: reqwest::Client) -> Self {
        Self {
            account,
            http,
            cached: RwLock::new(None),
        }
    }

    /// Returns a valid bearer token, minting a fresh one when the cached
    /// token is absent or about to expire.
    pub async fn bearer(&self) -> Result<String, TokenError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Utc::now() {
                    return Ok(token.value.clone());
                }
            }
        }

        let assertion = self.sign_assertion()?;
        let response = self
            .http
            .post(&self.account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Denied(body));
        }

        let token: TokenResponse = response.json().await?;
        let expires_at = Utc::now() + Duration::seconds(token.expires_in - EXPIRY_SLACK_SECS);
        let mut cached = self.cached.write().await;
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });
        Ok(token.access_token)
    }

    fn sign_assertion(&self) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.account.client_email,
            scope: SCOPES,
            aud: &self.account.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.account.private_key_id.clone());
        let key = EncodingKey::from_rsa_pem(self.account.private_key.as_bytes())?;
        Ok(encode(&header, &claims, &key)?)
    }
}
