use serde::{Deserialize, Serialize};

/// Dashboard overview counters. Every field is computed independently and
/// falls back to zero when its backing call fails, so the page always
/// renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub categories: u64,
    pub workers: u64,
    pub user_profiles: u64,
    pub active_this_week: u64,
    pub avg_rating: f64,
}
