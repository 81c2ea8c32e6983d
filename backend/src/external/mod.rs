//! Clients for the two managed services everything durable lives in: the
//! identity provider (login accounts) and the document store (worker,
//! user-profile and job-category collections). Both are reached over REST
//! with a cached service-account bearer token.

pub mod firestore;
pub mod identity;
pub mod token;

#[cfg(test)]
pub mod mock;
