use crate::services::{JOB_CATEGORIES, USER_PROFILES, WORKERS};
use crate::session::require_session;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::{Duration, Utc};
use common::model::metrics::DashboardMetrics;
use serde_json::Value;

pub async fn process(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    if let Err(denied) = require_session(&req, &state).await {
        return denied;
    }
    HttpResponse::Ok().json(collect_metrics(&state).await)
}

async fn collect_metrics(state: &AppState) -> DashboardMetrics {
    let mut metrics = DashboardMetrics::default();

    match state.identity.list_identities().await {
        Ok(identities) => {
            let week_ago = Utc::now() - Duration::days(7);
            metrics.total_users = identities.len() as u64;
            metrics.active_users = identities
                .iter()
                .filter(|i| i.last_sign_in.is_some())
                .count() as u64;
            metrics.inactive_users = metrics.total_users - metrics.active_users;
            metrics.active_this_week = identities
                .iter()
                .filter(|i| i.last_sign_in.is_some_and(|ts| ts >= week_ago))
                .count() as u64;
        }
        Err(e) => log::warn!("User metrics unavailable: {}", e),
    }

    match state.store.stream(JOB_CATEGORIES).await {
        Ok(docs) => metrics.categories = docs.len() as u64,
        Err(e) => log::warn!("Category count unavailable: {}", e),
    }

    match state.store.stream(WORKERS).await {
        Ok(docs) => {
            metrics.workers = docs.len() as u64;
            let ratings: Vec<f64> = docs
                .iter()
                .filter_map(|d| match d.fields.get("rating") {
                    Some(Value::Number(n)) => n.as_f64(),
                    _ => None,
                })
                .collect();
            if !ratings.is_empty() {
                let avg = ratings.iter().sum::<f64>() / ratings.len() as f64;
                metrics.avg_rating = (avg * 100.0).round() / 100.0;
            }
        }
        Err(e) => log::warn!("Worker metrics unavailable: {}", e),
    }

    match state.store.stream(USER_PROFILES).await {
        Ok(docs) => metrics.user_profiles = docs.len() as u64,
        Err(e) => log::warn!("User-profile count unavailable: {}", e),
    }

    metrics
}
