//! Domain services.

pub mod dashboard;
pub mod issuer;
pub mod store;

pub use dashboard::{Dashboard, DashboardError};
pub use issuer::{BulkIssueReport, IssueError, RsvpCodeIssuer};
pub use store::{CodeWrite, GuestStore, MemoryGuestStore, StoreError};
