pub mod auth;
pub mod categories;
pub mod imports;
pub mod metrics;
pub mod users;

/// Document-store collection names shared across services.
pub const WORKERS: &str = "workers";
pub const USER_PROFILES: &str = "user_profiles";
pub const JOB_CATEGORIES: &str = "job_categories";
