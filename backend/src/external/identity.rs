//! The identity provider holding login accounts, reached through the
//! Identity Toolkit admin REST API.

use crate::external::token::{TokenError, TokenMinter};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider already has an account for this email.
    #[error("Email already registered with the identity provider")]
    DuplicateEmail,
    #[error("identity provider unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Token(#[from] TokenError),
    #[error("identity provider error: {0}")]
    Api(String),
}

/// One account as the provider reports it.
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    pub uid: String,
    pub email: String,
    /// Absent for accounts that have never signed in.
    pub last_sign_in: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and returns its opaque uid.
    async fn create_identity(&self, email: &str, password: &str)
        -> Result<String, IdentityError>;
    /// Every account the provider knows, fetched page by page.
    async fn list_identities(&self) -> Result<Vec<IdentityRecord>, IdentityError>;
}

const SIGNUP_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:signUp";
const PAGE_SIZE: u32 = 500;

pub struct GoogleIdentityClient {
    project_id: String,
    http: reqwest::Client,
    token: Arc<TokenMinter>,
}

#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(rename = "localId")]
    local_id: String,
}

#[derive(Deserialize)]
struct BatchGetResponse {
    #[serde(default)]
    users: Vec<RawAccount>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct RawAccount {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(default)]
    email: String,
    /// Milliseconds since the epoch, as a decimal string.
    #[serde(rename = "lastLoginAt")]
    last_login_at: Option<String>,
}

impl GoogleIdentityClient {
    pub fn new(project_id: String, http: reqwest::Client, token: Arc<TokenMinter>) -> Self {
        Self {
            project_id,
            http,
            token,
        }
    }
}

fn parse_millis(raw: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = raw.parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

#[async_trait]
impl IdentityProvider for GoogleIdentityClient {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityError> {
        let bearer = self.token.bearer().await?;
        let response = self
            .http
            .post(SIGNUP_URL)
            .bearer_auth(bearer)
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": false,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            if body.contains("EMAIL_EXISTS") {
                return Err(IdentityError::DuplicateEmail);
            }
            return Err(IdentityError::Api(body));
        }

        let created: SignUpResponse = response.json().await?;
        Ok(created.local_id)
    }

    async fn list_identities(&self) -> Result<Vec<IdentityRecord>, IdentityError> {
        let url = format!(
            "https://identitytoolkit.googleapis.com/v1/projects/{}/accounts:batchGet",
            self.project_id
        );
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let bearer = self.token.bearer().await?;
            let mut request = self
                .http
                .get(&url)
                .query(&[("maxResults", PAGE_SIZE.to_string())])
                .bearer_auth(bearer);
            if let Some(ref token) = page_token {
                request = request.query(&[("nextPageToken", token.as_str())]);
            }
            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(IdentityError::Api(response.text().await.unwrap_or_default()));
            }
            let page: BatchGetResponse = response.json().await?;

            for account in page.users {
                records.push(IdentityRecord {
                    uid: account.local_id,
                    email: account.email,
                    last_sign_in: account.last_login_at.as_deref().and_then(parse_millis),
                });
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(records)
    }
}
