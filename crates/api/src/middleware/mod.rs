//! HTTP middleware components.

pub mod admin_session;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod security_headers;
pub mod trace_id;

pub use admin_session::{guard_admin_pages, require_admin_session, AdminSession};
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rate_limit::{rsvp_rate_limit, RateLimiterState};
pub use security_headers::security_headers_middleware;
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
