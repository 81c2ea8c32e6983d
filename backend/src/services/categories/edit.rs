use crate::external::firestore::Fields;
use crate::services::categories::{icon_data_uri, read_upload};
use crate::services::JOB_CATEGORIES;
use crate::session::require_session;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::Value;

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: Multipart,
) -> impl Responder {
    if let Err(denied) = require_session(&req, &state).await {
        return denied;
    }

    match edit_category(&state, &id, payload).await {
        Ok(()) => HttpResponse::Ok().body("Category updated successfully"),
        Err(e) => HttpResponse::BadRequest().body(format!("Error updating category: {}", e)),
    }
}

/// Partial update: name and description are always rewritten, the stored
/// icon only when the form carried a replacement image.
async fn edit_category(
    state: &AppState,
    id: &str,
    payload: Multipart,
) -> Result<(), Box<dyn std::error::Error>> {
    let upload = read_upload(payload).await?;

    let name = upload.payload.name.trim();
    if name.is_empty() {
        return Err("Category name cannot be empty.".into());
    }

    let icon = match upload.icon {
        Some(bytes) => Some(icon_data_uri(&bytes)?),
        None => None,
    };
    let fields = update_fields(name, upload.payload.description.trim(), icon);
    state.store.update(JOB_CATEGORIES, id, &fields).await?;
    Ok(())
}

fn update_fields(name: &str, description: &str, icon: Option<String>) -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".to_string(), Value::String(name.to_string()));
    fields.insert(
        "description".to_string(),
        Value::String(description.to_string()),
    );
    if let Some(icon) = icon {
        fields.insert("icon".to_string(), Value::String(icon));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::firestore::DocumentStore;
    use crate::external::mock::MemoryStore;
    use serde_json::json;

    #[test]
    fn icon_field_is_absent_without_a_replacement() {
        let fields = update_fields("Electrician", "Wiring", None);
        assert_eq!(fields["name"], json!("Electrician"));
        assert_eq!(fields["description"], json!("Wiring"));
        assert!(!fields.contains_key("icon"));
    }

    #[test]
    fn icon_field_is_present_with_a_replacement() {
        let fields = update_fields("Electrician", "", Some("data:image/png;base64,AA".into()));
        assert_eq!(fields["icon"], json!("data:image/png;base64,AA"));
    }

    #[actix_web::test]
    async fn editing_without_an_icon_keeps_the_stored_one() {
        let store = MemoryStore::default();
        store.insert(
            JOB_CATEGORIES,
            "c1",
            json!({
                "name": "Electrician",
                "description": "Old",
                "icon": "data:image/png;base64,OLD",
            })
            .as_object()
            .unwrap()
            .clone(),
        );

        let fields = update_fields("Electrician", "Old", None);
        store.update(JOB_CATEGORIES, "c1", &fields).await.unwrap();

        let doc = store.get(JOB_CATEGORIES, "c1").await.unwrap().unwrap();
        assert_eq!(doc.str_field("icon"), Some("data:image/png;base64,OLD"));
        assert_eq!(doc.str_field("name"), Some("Electrician"));
        assert_eq!(doc.str_field("description"), Some("Old"));
    }
}
