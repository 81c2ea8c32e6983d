//! Bulk worker import: template download, workbook validation, batch commit.
//!
//! The provided routes are:
//! - `GET  /api/imports/template`: generates the two-sheet workbook the admin
//!   fills in — an editable `Workers` sheet with the expected column headers
//!   and a protected `Job_Categories_Reference` sheet listing the valid
//!   profession names — and returns it as a downloadable .xlsx blob.
//!
//! - `POST /api/imports/validate`: accepts the filled workbook as a
//!   multipart upload, snapshots the reference sets (existing account
//!   emails, registered worker mobiles, the taxonomy), and runs every row
//!   through the validator. Nothing is written; the valid rows are parked
//!   under a fresh batch id until the admin confirms.
//!
//! - `POST /api/imports/run`: commits a previously validated batch. Rows are
//!   imported strictly in order; a row that fails at either the identity
//!   creation or the profile write is reported and skipped, never aborting
//!   the batch. The batch id is consumed either way.

mod importer;
mod run;
mod template;
mod validate;
mod validator;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/imports";

/// Column headers of the `Workers` sheet, in template order. The first four
/// are mandatory in an uploaded workbook.
pub(crate) const WORKER_COLUMNS: [&str; 11] = [
    "name",
    "email",
    "mobile",
    "whatsapp",
    "address",
    "gender",
    "profession",
    "hourlyRate",
    "experienceYears",
    "about",
    "languages",
];

pub(crate) const REQUIRED_COLUMNS: [&str; 4] = ["name", "email", "mobile", "profession"];

pub(crate) const WORKERS_SHEET: &str = "Workers";
pub(crate) const REFERENCE_SHEET: &str = "Job_Categories_Reference";

/// Configures and returns the Actix scope for bulk-import routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/template", get().to(template::process))
        .route("/validate", post().to(validate::process))
        .route("/run", post().to(run::process))
}
