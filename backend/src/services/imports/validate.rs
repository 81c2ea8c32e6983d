use crate::services::categories::taxonomy_names;
use crate::services::imports::validator::{validate_batch, ReferenceSets};
use crate::services::imports::{REQUIRED_COLUMNS, WORKERS_SHEET};
use crate::services::WORKERS;
use crate::session::require_session;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use calamine::{Data, Reader, Xlsx};
use common::model::validation::{ReportRow, RowStatus, ValidationReport};
use common::model::worker::CandidateRow;
use futures_util::StreamExt;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    if let Err(denied) = require_session(&req, &state).await {
        return denied;
    }

    match validate_upload(&state, payload).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

async fn validate_upload(
    state: &AppState,
    payload: Multipart,
) -> Result<ValidationReport, Box<dyn std::error::Error>> {
    let bytes = read_workbook(payload).await?;
    let rows = parse_rows(&bytes)?;
    let refs = snapshot_reference_sets(state).await;

    let outcomes = validate_batch(&rows, &refs);

    let valid_rows: Vec<CandidateRow> = outcomes
        .iter()
        .filter(|(_, outcome)| outcome.status == RowStatus::Valid)
        .map(|(row, _)| row.clone())
        .collect();
    let valid_count = valid_rows.len();
    let invalid_count = outcomes.len() - valid_count;

    let batch_id = uuid::Uuid::new_v4().to_string();
    state
        .batches
        .write()
        .await
        .insert(batch_id.clone(), valid_rows);

    Ok(ValidationReport {
        batch_id,
        valid_count,
        invalid_count,
        rows: outcomes
            .into_iter()
            .map(|(row, outcome)| ReportRow { row, outcome })
            .collect(),
    })
}

/// Reads the uploaded workbook bytes from the `file` multipart part.
async fn read_workbook(mut payload: Multipart) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let part_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if part_name.as_deref() == Some("file") {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                .unwrap_or_default();
            if !filename.ends_with(".xlsx") {
                return Err("The file must end with .xlsx".into());
            }

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                bytes.extend_from_slice(&chunk?);
            }
            return Ok(bytes);
        }
    }
    Err("Missing file".into())
}

/// Extracts candidate rows from the `Workers` sheet. Fails when the sheet or
/// any required column is missing; blank rows are skipped.
fn parse_rows(bytes: &[u8]) -> Result<Vec<CandidateRow>, String> {
    let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| format!("Error reading Excel file: {}", e))?;
    let range = workbook
        .worksheet_range(WORKERS_SHEET)
        .map_err(|_| format!("Error reading Excel file: missing '{}' sheet", WORKERS_SHEET))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or("The Workers sheet has no header row")?;

    let mut columns: HashMap<String, usize> = HashMap::new();
    for (i, cell) in header.iter().enumerate() {
        let title = cell_text(cell);
        if !title.is_empty() {
            columns.insert(title, i);
        }
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !columns.contains_key(**c))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(format!("Missing required columns: {}", missing.join(", ")));
    }

    let cell = |row: &[Data], key: &str| -> String {
        columns
            .get(key)
            .and_then(|&i| row.get(i))
            .map(cell_text)
            .unwrap_or_default()
    };

    Ok(rows
        .filter(|row| row.iter().any(|c| !cell_text(c).is_empty()))
        .map(|row| CandidateRow {
            name: cell(row, "name"),
            email: cell(row, "email"),
            mobile: cell(row, "mobile"),
            whatsapp: cell(row, "whatsapp"),
            address: cell(row, "address"),
            gender: cell(row, "gender"),
            profession: cell(row, "profession"),
            hourly_rate: cell(row, "hourlyRate"),
            experience_years: cell(row, "experienceYears"),
            about: cell(row, "about"),
            languages: cell(row, "languages"),
        })
        .collect())
}

/// Spreadsheet cells come back typed; mobiles entered as numbers must not
/// turn into "9876543210.0".
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Snapshot of the reference sets at validation start. Each source call that
/// fails degrades to an empty set with a warning; validation still runs.
async fn snapshot_reference_sets(state: &AppState) -> ReferenceSets {
    let mut existing_emails = HashSet::new();
    match state.identity.list_identities().await {
        Ok(identities) => {
            for identity in identities {
                if !identity.email.is_empty() {
                    existing_emails.insert(identity.email.to_lowercase());
                }
            }
        }
        Err(e) => log::warn!("Existing emails unavailable for validation: {}", e),
    }

    let mut existing_mobiles = HashSet::new();
    match state.store.stream(WORKERS).await {
        Ok(docs) => {
            for doc in docs {
                let mobile = doc.str_field("mobile").unwrap_or("").trim().to_string();
                if mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit()) {
                    existing_mobiles.insert(mobile);
                }
            }
        }
        Err(e) => log::warn!("Existing mobiles unavailable for validation: {}", e),
    }

    let known_professions = match taxonomy_names(state).await {
        Ok(names) => names.into_iter().map(|n| n.trim().to_string()).collect(),
        Err(e) => {
            log::warn!("Taxonomy unavailable for validation: {}", e);
            HashSet::new()
        }
    };

    ReferenceSets {
        existing_emails,
        existing_mobiles,
        known_professions,
    }
}
