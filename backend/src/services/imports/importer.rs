//! The batch importer: commits validated rows one at a time.
//!
//! For each row an identity is created with the fixed temporary password,
//! then a worker profile keyed by the new uid is written. The loop is
//! strictly sequential and a failed row never stops the batch; its email and
//! the underlying error are recorded instead. If the profile write fails
//! after the identity was created, the orphaned identity is left in place
//! and the failure is surfaced — there is no rollback across the two
//! services.

use crate::external::firestore::{DocumentStore, Fields};
use crate::external::identity::IdentityProvider;
use crate::services::WORKERS;
use chrono::Utc;
use common::model::worker::{CandidateRow, ImportFailure, ImportReport};
use serde_json::{json, Value};

/// Initial password for imported accounts; the template instructs workers to
/// change it on first login.
pub(crate) const TEMP_PASSWORD: &str = "TempPass123!";

const DEFAULT_PHOTO: &str =
    "https://firebasestorage.googleapis.com/v0/b/placeholder-images.appspot.com/o/default-avatar.png?alt=media";

pub async fn run(
    identity: &dyn IdentityProvider,
    store: &dyn DocumentStore,
    rows: &[CandidateRow],
) -> ImportReport {
    let mut imported = 0;
    let mut failures = Vec::new();

    for row in rows {
        let email = row.email.trim().to_string();

        let uid = match identity.create_identity(&email, TEMP_PASSWORD).await {
            Ok(uid) => uid,
            Err(e) => {
                failures.push(ImportFailure {
                    email,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Err(e) = store.set(WORKERS, &uid, &worker_fields(row)).await {
            failures.push(ImportFailure {
                email,
                reason: e.to_string(),
            });
            continue;
        }

        imported += 1;
    }

    ImportReport { imported, failures }
}

/// The profile document for one accepted row: its fields plus the system
/// defaults every new worker starts with.
fn worker_fields(row: &CandidateRow) -> Fields {
    let languages: Vec<Value> = row
        .languages
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| Value::String(l.to_string()))
        .collect();

    json!({
        "name": row.name.trim(),
        "email": row.email.trim(),
        "mobile": row.mobile.trim(),
        "whatsapp": row.whatsapp.trim(),
        "address": row.address.trim(),
        "gender": row.gender.trim(),
        "profession": row.profession.trim(),
        "hourlyRate": parse_count(&row.hourly_rate),
        "experienceYears": parse_count(&row.experience_years),
        "about": row.about.trim(),
        "languages": languages,
        "profilePhoto": DEFAULT_PHOTO,
        "isAvailable": true,
        "rating": 0.0,
        "totalJobs": 0,
        "createdAt": Utc::now().to_rfc3339(),
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

/// Spreadsheet numbers may arrive as "250" or "250.0"; anything unparsable
/// counts as zero.
fn parse_count(raw: &str) -> i64 {
    raw.trim().parse::<f64>().map(|n| n as i64).unwrap_or(0)
}
