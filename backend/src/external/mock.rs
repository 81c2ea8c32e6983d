//! In-memory stand-ins for the managed services, used by tests only.

use crate::external::firestore::{Document, DocumentStore, Fields, StoreError};
use crate::external::identity::{IdentityError, IdentityProvider, IdentityRecord};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Identity provider backed by a vector of (uid, email) pairs. Emails in
/// `rejected` behave like provider-side duplicates.
#[derive(Default)]
pub struct MemoryIdentity {
    pub created: Mutex<Vec<(String, String)>>,
    pub rejected: HashSet<String>,
}

impl MemoryIdentity {
    pub fn rejecting<I: IntoIterator<Item = &'static str>>(emails: I) -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            rejected: emails.into_iter().map(str::to_string).collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn create_identity(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<String, IdentityError> {
        if self.rejected.contains(email) {
            return Err(IdentityError::DuplicateEmail);
        }
        let mut created = self.created.lock().unwrap();
        let uid = format!("uid-{}", created.len() + 1);
        created.push((uid.clone(), email.to_string()));
        Ok(uid)
    }

    async fn list_identities(&self) -> Result<Vec<IdentityRecord>, IdentityError> {
        let created = self.created.lock().unwrap();
        Ok(created
            .iter()
            .map(|(uid, email)| IdentityRecord {
                uid: uid.clone(),
                email: email.clone(),
                last_sign_in: None,
            })
            .collect())
    }
}

/// Document store backed by nested hash maps. Collections listed in
/// `failing` error on every call, for exercising the degraded paths.
#[derive(Default)]
pub struct MemoryStore {
    pub docs: Mutex<HashMap<String, HashMap<String, Fields>>>,
    pub failing: HashSet<String>,
}

impl MemoryStore {
    pub fn failing_on<I: IntoIterator<Item = &'static str>>(collections: I) -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            failing: collections.into_iter().map(str::to_string).collect(),
        }
    }

    fn guard(&self, collection: &str) -> Result<(), StoreError> {
        if self.failing.contains(collection) {
            return Err(StoreError::Api {
                status: 503,
                body: format!("collection {} unavailable", collection),
            });
        }
        Ok(())
    }

    pub fn insert(&self, collection: &str, id: &str, fields: Fields) {
        self.docs
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    pub fn count(&self, collection: &str) -> usize {
        self.docs
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, HashMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.guard(collection)?;
        let docs = self.docs.lock().unwrap();
        Ok(docs.get(collection).and_then(|c| c.get(id)).map(|fields| {
            Document {
                id: id.to_string(),
                fields: fields.clone(),
            }
        }))
    }

    async fn set(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), StoreError> {
        self.guard(collection)?;
        self.insert(collection, id, fields.clone());
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), StoreError> {
        self.guard(collection)?;
        let mut docs = self.docs.lock().unwrap();
        let existing = docs
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default();
        for (key, value) in fields {
            existing.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn add(&self, collection: &str, fields: &Fields) -> Result<String, StoreError> {
        self.guard(collection)?;
        let id = format!("doc-{}", self.count(collection) + 1);
        self.insert(collection, &id, fields.clone());
        Ok(id)
    }

    async fn stream(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.guard(collection)?;
        let docs = self.docs.lock().unwrap();
        let mut all: Vec<Document> = docs
            .get(collection)
            .into_iter()
            .flatten()
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}
