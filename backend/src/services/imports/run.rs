use crate::services::imports::importer;
use crate::session::require_session;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::requests::RunImportRequest;

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RunImportRequest>,
) -> impl Responder {
    if let Err(denied) = require_session(&req, &state).await {
        return denied;
    }

    // Taking the batch out makes the id single-use: a retry after a partial
    // failure must revalidate rather than double-import.
    let rows = state.batches.write().await.remove(&body.batch_id);

    match rows {
        Some(rows) => {
            log::info!("Importing batch {} ({} rows)", body.batch_id, rows.len());
            let report = importer::run(state.identity.as_ref(), state.store.as_ref(), &rows).await;
            HttpResponse::Ok().json(report)
        }
        None => HttpResponse::NotFound().body("Unknown or already imported batch"),
    }
}
