//! Browsing and searching the platform's accounts.
//!
//! The provided routes are:
//! - `GET /api/users`: every identity-provider account joined with its
//!   profile document (a `workers` document makes it a Worker, a
//!   `user_profiles` document a User, neither leaves it Unknown). Supports
//!   `?search=` (name/email/profession substring), `?role=`, `?profession=`
//!   and `?active=` filters. An account is active once it has signed in.
//! - `GET /api/users/{uid}`: the full profile document for the detail view.

mod list;
mod profile;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/users";

/// Configures and returns the Actix scope for user-browsing routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/{uid}", get().to(profile::process))
}
