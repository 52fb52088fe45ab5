//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod admin_auth;
pub mod json;

pub use admin_auth::AdminAuth;
pub use json::ApiJson;
