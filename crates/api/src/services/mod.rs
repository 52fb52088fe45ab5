//! Application services used by the route handlers.

pub mod admin_auth;
pub mod cookies;

pub use admin_auth::{AdminAuthError, AdminAuthService, AdminLogin};
pub use cookies::CookieHelper;
