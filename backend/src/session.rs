//! Admin session tracking and the credential check behind the login form.

use crate::config::AdminCredentials;
use crate::state::AppState;
use actix_web::{HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};

/// Verifies a submitted credential pair. The dashboard ships with the static
/// single-credential implementation below; a real identity backend can be
/// substituted without touching the login handler.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> bool;
}

/// Exact string comparison against the configured admin email and password.
/// No lockout, no backoff; explicitly not production-grade.
pub struct StaticCredentials {
    email: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(admin: &AdminCredentials) -> Self {
        Self {
            email: admin.email.clone(),
            password: admin.password.clone(),
        }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, email: &str, password: &str) -> bool {
        email == self.email && password == self.password
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub email: String,
    pub started_at: DateTime<Utc>,
}

/// Extracts the bearer token from the `Authorization` header, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolves the request's session, or the 401 response to return instead.
/// Every `/api` handler except login calls this first.
pub async fn require_session(req: &HttpRequest, state: &AppState) -> Result<Session, HttpResponse> {
    let token = match bearer_token(req) {
        Some(token) => token,
        None => return Err(HttpResponse::Unauthorized().body("Not signed in")),
    };
    match state.sessions.read().await.get(token) {
        Some(session) => Ok(session.clone()),
        None => Err(HttpResponse::Unauthorized().body("Not signed in")),
    }
}
