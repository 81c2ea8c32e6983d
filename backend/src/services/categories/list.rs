use crate::external::firestore::StoreError;
use crate::services::{JOB_CATEGORIES, WORKERS};
use crate::session::require_session;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::model::category::Category;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
pub struct CategorySearch {
    pub search: Option<String>,
}

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<CategorySearch>,
) -> impl Responder {
    if let Err(denied) = require_session(&req, &state).await {
        return denied;
    }

    match load_categories(&state).await {
        Ok(categories) => {
            let filtered = match query.search.as_deref() {
                Some(term) if !term.trim().is_empty() => {
                    let needle = term.trim().to_lowercase();
                    categories
                        .into_iter()
                        .filter(|c| c.name.to_lowercase().contains(&needle))
                        .collect()
                }
                _ => categories,
            };
            HttpResponse::Ok().json(filtered)
        }
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error loading categories: {}", e))
        }
    }
}

/// All named categories ordered by name, joined with per-profession worker
/// counts. Documents without a name are skipped.
async fn load_categories(state: &AppState) -> Result<Vec<Category>, StoreError> {
    let docs = state.store.stream(JOB_CATEGORIES).await?;
    let counts = worker_counts(state).await;

    let mut categories: Vec<Category> = docs
        .iter()
        .filter_map(|doc| {
            let name = doc.str_field("name").unwrap_or("").trim().to_string();
            if name.is_empty() {
                return None;
            }
            let description = doc.str_field("description").unwrap_or("").to_string();
            Some(Category {
                id: doc.id.clone(),
                icon: doc.str_field("icon").unwrap_or("").to_string(),
                description: if description.is_empty() {
                    "No description".to_string()
                } else {
                    description
                },
                workers: counts.get(&name).copied().unwrap_or(0),
                name,
            })
        })
        .collect();

    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
}

/// Worker count per trimmed profession name. A failed stream degrades to no
/// counts rather than failing the category list.
async fn worker_counts(state: &AppState) -> HashMap<String, u64> {
    match state.store.stream(WORKERS).await {
        Ok(docs) => {
            let mut counts: HashMap<String, u64> = HashMap::new();
            for doc in docs {
                let profession = doc.str_field("profession").unwrap_or("").trim().to_string();
                if !profession.is_empty() {
                    *counts.entry(profession).or_insert(0) += 1;
                }
            }
            counts
        }
        Err(e) => {
            log::warn!("Worker counts unavailable: {}", e);
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminCredentials;
    use crate::external::mock::{MemoryIdentity, MemoryStore};
    use crate::session::StaticCredentials;
    use serde_json::json;
    use std::sync::Arc;

    fn fields(value: serde_json::Value) -> crate::external::firestore::Fields {
        value.as_object().unwrap().clone()
    }

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
    async fn lists_named_categories_sorted_with_counts() {
        let store = MemoryStore::default();
        store.insert(
            JOB_CATEGORIES,
            "c2",
            fields(json!({ "name": "Plumber", "icon": "data:...", "description": "" })),
        );
        store.insert(
            JOB_CATEGORIES,
            "c1",
            fields(json!({ "name": "Electrician", "icon": "data:...", "description": "Wiring" })),
        );
        store.insert(JOB_CATEGORIES, "c3", fields(json!({ "name": "  " })));
        store.insert(WORKERS, "w1", fields(json!({ "profession": "Electrician" })));
        store.insert(WORKERS, "w2", fields(json!({ "profession": "Electrician " })));

        let state = state_with(store);
        let categories = load_categories(&state).await.unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Electrician");
        assert_eq!(categories[0].workers, 2);
        assert_eq!(categories[0].description, "Wiring");
        assert_eq!(categories[1].name, "Plumber");
        assert_eq!(categories[1].description, "No description");
    }

    #[actix_web::test]
    async fn worker_count_failure_degrades_to_zero() {
        let store = MemoryStore::failing_on([WORKERS]);
        store.insert(
            JOB_CATEGORIES,
            "c1",
            fields(json!({ "name": "Electrician" })),
        );

        let state = state_with(store);
        let categories = load_categories(&state).await.unwrap();
        assert_eq!(categories[0].workers, 0);
    }
}
