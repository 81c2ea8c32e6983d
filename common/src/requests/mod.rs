use serde::{Deserialize, Serialize};

/// Credentials submitted by the admin login form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session token handed back on a successful login; sent as
/// `Authorization: Bearer <token>` on every subsequent API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// The `json` part of the multipart body for category add/edit. The icon
/// travels as a separate `icon` file part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request payload for committing a previously validated import batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunImportRequest {
    pub batch_id: String,
}
