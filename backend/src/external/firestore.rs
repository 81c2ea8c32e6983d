//! The document store behind the dashboard: collection-scoped reads and
//! writes against the Firestore REST API.
//!
//! Handlers work with plain `serde_json` field maps; the typed Firestore
//! value JSON (`stringValue`, `integerValue`, `mapValue`, ...) is an
//! implementation detail of this module and converted at the boundary in
//! both directions. Per-document writes are atomic on the service side;
//! nothing here uses cross-document transactions.

use crate::external::token::{TokenError, TokenMinter};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use thiserror::Error;

pub type Fields = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Token(#[from] TokenError),
    #[error("document store error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("unexpected document payload: {0}")]
    Malformed(String),
}

/// One stored document: its id within the collection plus its fields as
/// plain JSON.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// String value of a field, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;
    /// Creates or fully replaces the document.
    async fn set(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), StoreError>;
    /// Partial update: only the given fields are touched.
    async fn update(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), StoreError>;
    /// Adds a document with a server-assigned id, which is returned.
    async fn add(&self, collection: &str, fields: &Fields) -> Result<String, StoreError>;
    /// All documents of a collection, in storage order.
    async fn stream(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
}

const PAGE_SIZE: u32 = 300;

pub struct FirestoreClient {
    base: String,
    http: reqwest::Client,
    token: Arc<TokenMinter>,
}

impl FirestoreClient {
    pub fn new(project_id: String, http: reqwest::Client, token: Arc<TokenMinter>) -> Self {
        Self {
            base: format!(
                "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
                project_id
            ),
            http,
            token,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(StoreError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    fn parse_document(raw: &Value) -> Result<Document, StoreError> {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Malformed("document without a name".to_string()))?;
        let id = name.rsplit('/').next().unwrap_or(name).to_string();
        let fields = raw
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_default();
        Ok(Document { id, fields })
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let bearer = self.token.bearer().await?;
        let response = self
            .http
            .get(format!("{}/{}/{}", self.base, collection, id))
            .bearer_auth(bearer)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let raw: Value = Self::check(response).await?.json().await?;
        Ok(Some(Self::parse_document(&raw)?))
    }

    async fn set(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), StoreError> {
        let bearer = self.token.bearer().await?;
        let response = self
            .http
            .patch(format!("{}/{}/{}", self.base, collection, id))
            .bearer_auth(bearer)
            .json(&json!({ "fields": encode_fields(fields) }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), StoreError> {
        let bearer = self.token.bearer().await?;
        // The field mask limits the patch to exactly the supplied fields.
        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.as_str()))
            .collect();
        let response = self
            .http
            .patch(format!("{}/{}/{}", self.base, collection, id))
            .query(&mask)
            .bearer_auth(bearer)
            .json(&json!({ "fields": encode_fields(fields) }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn add(&self, collection: &str, fields: &Fields) -> Result<String, StoreError> {
        let bearer = self.token.bearer().await?;
        let response = self
            .http
            .post(format!("{}/{}", self.base, collection))
            .bearer_auth(bearer)
            .json(&json!({ "fields": encode_fields(fields) }))
            .send()
            .await?;
        let raw: Value = Self::check(response).await?.json().await?;
        Ok(Self::parse_document(&raw)?.id)
    }

    async fn stream(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let bearer = self.token.bearer().await?;
            let mut request = self
                .http
                .get(format!("{}/{}", self.base, collection))
                .query(&[("pageSize", PAGE_SIZE.to_string())])
                .bearer_auth(bearer);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            let raw: Value = Self::check(request.send().await?).await?.json().await?;

            if let Some(page) = raw.get("documents").and_then(Value::as_array) {
                for doc in page {
                    documents.push(Self::parse_document(doc)?);
                }
            }

            match raw.get("nextPageToken").and_then(Value::as_str) {
                Some(token) => page_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(documents)
    }
}

/// Plain JSON -> Firestore typed value.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Firestore typed value -> plain JSON. Integers arrive as decimal strings;
/// timestamps come back as their RFC 3339 text.
pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    if let Some((kind, inner)) = obj.iter().next() {
        match kind.as_str() {
            "nullValue" => Value::Null,
            "booleanValue" | "doubleValue" | "stringValue" | "timestampValue"
            | "referenceValue" => inner.clone(),
            "integerValue" => inner
                .as_str()
                .and_then(|s| s.parse::<i64>().ok())
                .map(Value::from)
                .unwrap_or(Value::Null),
            "arrayValue" => {
                let items = inner
                    .get("values")
                    .and_then(Value::as_array)
                    .map(|values| values.iter().map(decode_value).collect())
                    .unwrap_or_default();
                Value::Array(items)
            }
            "mapValue" => inner
                .get("fields")
                .and_then(Value::as_object)
                .map(|fields| Value::Object(decode_fields(fields)))
                .unwrap_or_else(|| Value::Object(Map::new())),
            _ => Value::Null,
        }
    } else {
        Value::Null
    }
}

pub fn encode_fields(fields: &Fields) -> Fields {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

pub fn decode_fields(fields: &Fields) -> Fields {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_worker_shaped_map() {
        let fields = json!({
            "name": "Asha",
            "isAvailable": true,
            "rating": 0.0,
            "totalJobs": 0,
            "languages": ["Hindi", "English"],
        });
        let encoded = encode_fields(fields.as_object().unwrap());

        assert_eq!(encoded["name"], json!({ "stringValue": "Asha" }));
        assert_eq!(encoded["isAvailable"], json!({ "booleanValue": true }));
        assert_eq!(encoded["rating"], json!({ "doubleValue": 0.0 }));
        assert_eq!(encoded["totalJobs"], json!({ "integerValue": "0" }));
        assert_eq!(
            encoded["languages"],
            json!({ "arrayValue": { "values": [
                { "stringValue": "Hindi" },
                { "stringValue": "English" },
            ]}})
        );
    }

    #[test]
    fn decodes_integers_and_timestamps() {
        let typed = json!({
            "totalJobs": { "integerValue": "12" },
            "createdAt": { "timestampValue": "2026-01-31T00:00:00Z" },
            "missing": { "nullValue": null },
        });
        let decoded = decode_fields(typed.as_object().unwrap());

        assert_eq!(decoded["totalJobs"], json!(12));
        assert_eq!(decoded["createdAt"], json!("2026-01-31T00:00:00Z"));
        assert_eq!(decoded["missing"], Value::Null);
    }

    #[test]
    fn nested_maps_round_trip() {
        let fields = json!({ "meta": { "source": "bulk-import", "row": 7 } });
        let encoded = encode_fields(fields.as_object().unwrap());
        let decoded = decode_fields(&encoded);
        assert_eq!(Value::Object(decoded), fields);
    }
}
