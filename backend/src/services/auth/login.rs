use crate::session::Session;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use common::requests::{LoginRequest, LoginResponse};

pub async fn process(state: web::Data<AppState>, payload: web::Json<LoginRequest>) -> impl Responder {
    if !state.verifier.verify(&payload.email, &payload.password) {
        // Deliberately generic: the form shows one message for any mismatch.
        return HttpResponse::Unauthorized().body("Invalid admin credentials. Please try again.");
    }

    let token = uuid::Uuid::new_v4().to_string();
    state.sessions.write().await.insert(
        token.clone(),
        Session {
            email: payload.email.clone(),
            started_at: Utc::now(),
        },
    );
    HttpResponse::Ok().json(LoginResponse { token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminCredentials;
    use crate::external::mock::{MemoryIdentity, MemoryStore};
    use crate::session::StaticCredentials;
    use std::sync::Arc;

    fn test_state() -> AppState {
        AppState::with_services(
            Arc::new(StaticCredentials::new(&AdminCredentials {
                email: "admin@example.com".to_string(),
                password: "AdminPass123!".to_string(),
            })),
            Arc::new(MemoryIdentity::default()),
            Arc::new(MemoryStore::default()),
        )
    }

    #[actix_web::test]
    async fn successful_login_opens_a_session() {
        let state = test_state();
        let data = web::Data::new(state.clone());
        let payload = web::Json(LoginRequest {
            email: "admin@example.com".to_string(),
            password: "AdminPass123!".to_string(),
        });

        let _ = process(data, payload).await;
        assert_eq!(state.sessions.read().await.len(), 1);
    }

    #[actix_web::test]
    async fn wrong_password_opens_nothing() {
        let state = test_state();
        let data = web::Data::new(state.clone());
        let payload = web::Json(LoginRequest {
            email: "admin@example.com".to_string(),
            password: "wrong".to_string(),
        });

        let _ = process(data, payload).await;
        assert!(state.sessions.read().await.is_empty());
    }
}
