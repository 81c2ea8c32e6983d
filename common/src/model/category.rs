use serde::{Deserialize, Serialize};

/// A job-category taxonomy entry as shown in the dashboard.
///
/// `icon` is a self-contained `data:<mime>;base64,...` URI; `workers` is the
/// number of worker profiles whose profession matches this category's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub workers: u64,
}
