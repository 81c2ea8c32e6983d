use crate::model::worker::CandidateRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStatus {
    Valid,
    Invalid,
}

/// Per-row verdict produced by the batch validator.
///
/// `row_number` is the 1-based spreadsheet row (data starts at row 2, row 1
/// being the header), so it can be quoted back to the user as-is.
/// A row is `Invalid` exactly when `errors` is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_number: u32,
    pub status: RowStatus,
    pub errors: Vec<String>,
}

/// A candidate row together with its validation verdict, as returned to the
/// dashboard after an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub row: CandidateRow,
    pub outcome: RowOutcome,
}

/// Full validation result for one uploaded workbook. The valid rows are held
/// server-side under `batch_id` until the admin confirms the import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub batch_id: String,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub rows: Vec<ReportRow>,
}
