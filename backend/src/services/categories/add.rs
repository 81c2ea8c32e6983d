use crate::services::categories::{icon_data_uri, read_upload};
use crate::services::JOB_CATEGORIES;
use crate::session::require_session;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde_json::{Map, Value};

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    if let Err(denied) = require_session(&req, &state).await {
        return denied;
    }

    match add_category(&state, payload).await {
        Ok(id) => HttpResponse::Ok().body(id),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

/// Persists a new category and returns its server-assigned id. Both a
/// non-empty name and an icon image are mandatory.
async fn add_category(
    state: &AppState,
    payload: Multipart,
) -> Result<String, Box<dyn std::error::Error>> {
    let upload = read_upload(payload).await?;

    let name = upload.payload.name.trim().to_string();
    if name.is_empty() {
        return Err("Name and icon are required.".into());
    }
    let icon = upload.icon.ok_or("Name and icon are required.")?;
    let icon = icon_data_uri(&icon)?;

    let mut fields = Map::new();
    fields.insert("name".to_string(), Value::String(name));
    fields.insert(
        "description".to_string(),
        Value::String(upload.payload.description.trim().to_string()),
    );
    fields.insert("icon".to_string(), Value::String(icon));
    fields.insert(
        "created_at".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );

    Ok(state.store.add(JOB_CATEGORIES, &fields).await?)
}
