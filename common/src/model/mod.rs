pub mod category;
pub mod credentials;
pub mod metrics;
pub mod user;
pub mod validation;
pub mod worker;
