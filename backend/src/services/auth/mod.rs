//! Admin sign-in and sign-out.
//!
//! The provided routes are:
//! - `POST /api/auth/login`: checks the submitted credential pair against the
//!   configured `CredentialVerifier` and, on success, opens a session and
//!   returns its bearer token. On mismatch it answers a generic 401 with no
//!   lockout or backoff.
//! - `POST /api/auth/logout`: drops the session named by the request's
//!   bearer token.

mod login;
mod logout;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/auth";

/// Configures and returns the Actix scope for authentication routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/login", post().to(login::process))
        .route("/logout", post().to(logout::process))
}
