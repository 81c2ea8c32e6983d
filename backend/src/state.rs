//! Shared application state injected into every handler as `web::Data`.
//!
//! All session and import-batch bookkeeping lives here rather than in
//! ambient globals, so a handler only sees the state it is handed. The
//! external services sit behind trait objects; production wires in the
//! Google REST clients, tests substitute in-memory mocks.

use crate::config::Settings;
use crate::external::firestore::{DocumentStore, FirestoreClient};
use crate::external::identity::{GoogleIdentityClient, IdentityProvider};
use crate::external::token::TokenMinter;
use crate::session::{CredentialVerifier, Session, StaticCredentials};
use common::model::worker::CandidateRow;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn CredentialVerifier>,
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn DocumentStore>,

    /// Live admin sessions, keyed by bearer token.
    pub sessions: Arc<RwLock<HashMap<String, Session>>>,

    /// Validated-but-uncommitted import batches, keyed by batch id. A batch
    /// holds only its valid rows; it is removed when imported.
    pub batches: Arc<RwLock<HashMap<String, Vec<CandidateRow>>>>,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        let http = reqwest::Client::new();
        let minter = Arc::new(TokenMinter::new(
            settings.service_account.clone(),
            http.clone(),
        ));
        let project_id = settings.service_account.project_id.clone();

        Self::with_services(
            Arc::new(StaticCredentials::new(&settings.admin)),
            Arc::new(GoogleIdentityClient::new(
                project_id.clone(),
                http.clone(),
                minter.clone(),
            )),
            Arc::new(FirestoreClient::new(project_id, http, minter)),
        )
    }

    pub fn with_services(
        verifier: Arc<dyn CredentialVerifier>,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            verifier,
            identity,
            store,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            batches: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
