use serde::{Deserialize, Serialize};

/// One row of the Users/Employees table: an identity-provider account joined
/// with its profile document, pre-formatted for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub uid: String,
    pub name: String,
    pub email: String,
    /// "Worker", "User" or "Unknown" depending on which profile collection
    /// holds the account's document.
    pub role: String,
    pub mobile: String,
    pub profession: String,
    /// e.g. "₹250" or "N/A".
    pub hourly_rate: String,
    /// e.g. "4.5★".
    pub rating: String,
    /// e.g. "3 yrs".
    pub experience: String,
    /// Formatted date of the last sign-in, or "Never".
    pub last_login: String,
    pub is_active: bool,
}
