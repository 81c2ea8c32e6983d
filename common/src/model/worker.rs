use serde::{Deserialize, Serialize};

/// One raw row read from the `Workers` sheet of an uploaded workbook.
///
/// Every field is kept as the string the spreadsheet contained; nothing is
/// parsed or normalized at this stage. Numeric fields (`hourly_rate`,
/// `experience_years`) are converted only when a worker profile is actually
/// written, and `languages` stays a comma-delimited list until then. A row
/// has no identity of its own until it passes validation and is imported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRow {
    pub name: String,
    pub email: String,
    pub mobile: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gender: String,
    pub profession: String,
    #[serde(default)]
    pub hourly_rate: String,
    #[serde(default)]
    pub experience_years: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub languages: String,
}

/// Outcome of committing one batch of validated rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rows for which both the identity and the profile write succeeded.
    pub imported: u32,
    /// Rows that failed at either step; the batch continues past them.
    pub failures: Vec<ImportFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportFailure {
    pub email: String,
    pub reason: String,
}
