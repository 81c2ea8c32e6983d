//! Job-category taxonomy management.
//!
//! The provided routes are:
//! - `GET  /api/categories`: lists every category ordered by name, each with
//!   the number of worker profiles whose profession matches it. Supports a
//!   `?search=` substring filter.
//! - `POST /api/categories`: adds a category from a multipart body: a `json`
//!   part with name and description, and a mandatory `icon` image part.
//! - `POST /api/categories/{id}`: edits a category. Name and description are
//!   always overwritten; the icon only when a replacement image is supplied.
//!
//! Uploaded icons are sniffed (PNG/JPEG only) and embedded into the category
//! document as a base64 data URI, so no separate object store is involved.
//! Category names are expected to be unique but this is not enforced at
//! write time.

mod add;
mod edit;
mod list;

use crate::external::firestore::StoreError;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::web::{get, post, scope};
use actix_web::Scope;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use common::requests::CategoryPayload;
use futures_util::StreamExt;
use image::ImageFormat;

const API_PATH: &str = "/api/categories";

/// Configures and returns the Actix scope for category routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(add::process))
        .route("/{id}", post().to(edit::process))
}

/// The decoded multipart body of an add/edit request.
pub(crate) struct CategoryUpload {
    pub payload: CategoryPayload,
    pub icon: Option<Vec<u8>>,
}

/// Reads the `json` and optional `icon` parts of a category form.
pub(crate) async fn read_upload(
    mut payload: Multipart,
) -> Result<CategoryUpload, Box<dyn std::error::Error>> {
    let mut meta: Option<CategoryPayload> = None;
    let mut icon: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let part_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match part_name.as_deref() {
            Some("json") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    bytes.extend_from_slice(&chunk?);
                }
                meta = Some(serde_json::from_slice(&bytes)?);
            }
            Some("icon") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    bytes.extend_from_slice(&chunk?);
                }
                if !bytes.is_empty() {
                    icon = Some(bytes);
                }
            }
            _ => {}
        }
    }

    Ok(CategoryUpload {
        payload: meta.ok_or("Missing category JSON")?,
        icon,
    })
}

/// Embeds uploaded icon bytes as a self-contained data URI, rejecting
/// anything that is not a PNG or JPEG.
pub(crate) fn icon_data_uri(bytes: &[u8]) -> Result<String, String> {
    let mime = match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        _ => return Err("Icon must be a PNG or JPEG image".to_string()),
    };
    Ok(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
}

/// Current taxonomy: every non-empty category name, sorted.
pub(crate) async fn taxonomy_names(state: &AppState) -> Result<Vec<String>, StoreError> {
    let docs = state.store.stream(super::JOB_CATEGORIES).await?;
    let mut names: Vec<String> = docs
        .iter()
        .filter_map(|doc| {
            let name = doc.str_field("name")?.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect();
    names.sort();
    Ok(names)
}
