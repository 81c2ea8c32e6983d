use crate::session::bearer_token;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

pub async fn process(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    if let Some(token) = bearer_token(&req) {
        state.sessions.write().await.remove(token);
    }
    HttpResponse::Ok().body("Logged out")
}
