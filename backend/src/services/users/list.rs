use crate::external::firestore::Fields;
use crate::external::identity::IdentityRecord;
use crate::services::{USER_PROFILES, WORKERS};
use crate::session::require_session;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::{DateTime, FixedOffset, Utc};
use common::model::user::UserSummary;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub profession: Option<String>,
    pub active: Option<bool>,
}

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> impl Responder {
    if let Err(denied) = require_session(&req, &state).await {
        return denied;
    }

    let identities = match state.identity.list_identities().await {
        Ok(identities) => identities,
        Err(e) => {
            return HttpResponse::ServiceUnavailable().body(format!("Error loading users: {}", e))
        }
    };

    // One stream per collection instead of a lookup per account; a failed
    // stream leaves those accounts Unknown but keeps the page rendering.
    let workers = profile_map(&state, WORKERS).await;
    let user_profiles = profile_map(&state, USER_PROFILES).await;

    let users: Vec<UserSummary> = identities
        .iter()
        .map(|account| summarize(account, &workers, &user_profiles))
        .collect();

    HttpResponse::Ok().json(apply_filters(users, &query))
}

async fn profile_map(state: &AppState, collection: &str) -> HashMap<String, Fields> {
    match state.store.stream(collection).await {
        Ok(docs) => docs.into_iter().map(|d| (d.id, d.fields)).collect(),
        Err(e) => {
            log::warn!("Profiles from {} unavailable: {}", collection, e);
            HashMap::new()
        }
    }
}

fn summarize(
    account: &IdentityRecord,
    workers: &HashMap<String, Fields>,
    user_profiles: &HashMap<String, Fields>,
) -> UserSummary {
    let (profile, role) = if let Some(fields) = workers.get(&account.uid) {
        (Some(fields), "Worker")
    } else if let Some(fields) = user_profiles.get(&account.uid) {
        (Some(fields), "User")
    } else {
        (None, "Unknown")
    };

    UserSummary {
        uid: account.uid.clone(),
        name: text_field(profile, "name").unwrap_or_else(|| account.email.clone()),
        email: account.email.clone(),
        role: role.to_string(),
        mobile: text_field(profile, "mobile").unwrap_or_else(|| "N/A".to_string()),
        profession: text_field(profile, "profession").unwrap_or_else(|| "N/A".to_string()),
        hourly_rate: match number_field(profile, "hourlyRate") {
            Some(rate) if rate > 0.0 => format!("₹{}", trim_number(rate)),
            _ => "N/A".to_string(),
        },
        rating: format!("{}★", trim_number(number_field(profile, "rating").unwrap_or(0.0))),
        experience: format!(
            "{} yrs",
            trim_number(number_field(profile, "experienceYears").unwrap_or(0.0))
        ),
        last_login: format_last_login(account.last_sign_in),
        is_active: account.last_sign_in.is_some(),
    }
}

fn text_field(profile: Option<&Fields>, key: &str) -> Option<String> {
    let value = profile?.get(key)?.as_str()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn number_field(profile: Option<&Fields>, key: &str) -> Option<f64> {
    match profile?.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// "4.0" renders as "4", "4.5" stays "4.5".
fn trim_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Last sign-in shown in IST, the platform's home timezone.
fn format_last_login(last_sign_in: Option<DateTime<Utc>>) -> String {
    match last_sign_in {
        Some(ts) => {
            let ist = FixedOffset::east_opt(5 * 3600 + 1800).expect("static offset");
            ts.with_timezone(&ist).format("%b %d, %Y").to_string()
        }
        None => "Never".to_string(),
    }
}

fn apply_filters(users: Vec<UserSummary>, query: &UserQuery) -> Vec<UserSummary> {
    users
        .into_iter()
        .filter(|u| match query.search.as_deref() {
            Some(term) if !term.trim().is_empty() => {
                let needle = term.trim().to_lowercase();
                u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
                    || u.profession.to_lowercase().contains(&needle)
            }
            _ => true,
        })
        .filter(|u| match query.role.as_deref() {
            Some(role) if !role.is_empty() => u.role == role,
            _ => true,
        })
        .filter(|u| match query.profession.as_deref() {
            Some(profession) if !profession.is_empty() => u.profession == profession,
            _ => true,
        })
        .filter(|u| match query.active {
            Some(active) => u.is_active == active,
            None => true,
        })
        .collect()
}
