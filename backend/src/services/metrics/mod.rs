//! Dashboard overview counters.
//!
//! Single route `GET /api/metrics`. Each counter is computed independently
//! and degrades to zero when its backing service call fails, so a broken
//! collection never blanks the whole dashboard.

mod summary;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/metrics";

/// Configures and returns the Actix scope for the metrics route.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(summary::process))
}
