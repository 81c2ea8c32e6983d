use crate::external::firestore::{Fields, StoreError};
use crate::services::{USER_PROFILES, WORKERS};
use crate::session::require_session;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::{json, Value};

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    uid: web::Path<String>,
) -> impl Responder {
    if let Err(denied) = require_session(&req, &state).await {
        return denied;
    }

    match load_profile(&state, &uid).await {
        Ok(Some((role, fields))) => HttpResponse::Ok().json(json!({
            "uid": uid.as_str(),
            "role": role,
            "profile": Value::Object(fields),
        })),
        Ok(None) => HttpResponse::NotFound()
            .body("Failed to load profile. The user may have been deleted."),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error loading profile: {}", e)),
    }
}

/// Looks the uid up in `workers` first, then `user_profiles`.
async fn load_profile(
    state: &AppState,
    uid: &str,
) -> Result<Option<(&'static str, Fields)>, StoreError> {
    if let Some(doc) = state.store.get(WORKERS, uid).await? {
        return Ok(Some(("Worker", doc.fields)));
    }
    if let Some(doc) = state.store.get(USER_PROFILES, uid).await? {
        return Ok(Some(("User", doc.fields)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminCredentials;
    use crate::external::mock::{MemoryIdentity, MemoryStore};
    use crate::session::StaticCredentials;
    use std::sync::Arc;

    fn state_with(store: MemoryStore) -> AppState {
        AppState::with_services(
            Arc::new(StaticCredentials::new(&AdminCredentials {
                email: "a".to_string(),
                password: "b".to_string(),
            })),
            Arc::new(MemoryIdentity::default()),
            Arc::new(store),
        )
    }

    #[actix_web::test]
    async fn workers_take_precedence_over_user_profiles() {
        let store = MemoryStore::default();
        let fields = serde_json::json!({ "name": "Asha" });
        store.insert(WORKERS, "u1", fields.as_object().unwrap().clone());
        store.insert(USER_PROFILES, "u1", fields.as_object().unwrap().clone());

        let state = state_with(store);
        let (role, _) = load_profile(&state, "u1").await.unwrap().unwrap();
        assert_eq!(role, "Worker");
    }

    #[actix_web::test]
    async fn unknown_uid_is_none() {
        let state = state_with(MemoryStore::default());
        assert!(load_profile(&state, "ghost").await.unwrap().is_none());
    }
}
