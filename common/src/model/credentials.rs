use serde::{Deserialize, Serialize};

/// A Google service-account key, as found in the JSON file downloaded from
/// the cloud console and as stored under `[service_account]` in
/// `secrets.toml`. Shared between the backend configuration loader and the
/// `convert-credentials` utility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccount {
    #[serde(rename = "type")]
    pub account_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
}
