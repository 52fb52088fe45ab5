//! RSVP code issuance.
//!
//! A group receives at most one code, ever. The in-memory check only saves
//! a round trip; the conditional write in the store decides.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::store::{CodeWrite, GuestStore, StoreError};
use crate::models::GuestGroup;

/// Fresh codes tried before giving up on collisions.
const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("Guest group {0} already has an RSVP code")]
    AlreadyIssued(Uuid),

    #[error("Guest group not found: {0}")]
    NotFound(Uuid),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for IssueError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => IssueError::NotFound(id),
            StoreError::Unavailable(msg) => IssueError::StoreUnavailable(msg),
            StoreError::CodeCollision => {
                IssueError::StoreUnavailable("could not allocate a unique RSVP code".to_string())
            }
        }
    }
}

/// Result of issuing codes for several groups.
#[derive(Debug, Default)]
pub struct BulkIssueReport {
    pub issued: Vec<GuestGroup>,
    pub failed: Vec<(Uuid, IssueError)>,
}

type CodeGenerator = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct RsvpCodeIssuer {
    store: Arc<dyn GuestStore>,
    generate: CodeGenerator,
}

impl fmt::Debug for RsvpCodeIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsvpCodeIssuer").finish_non_exhaustive()
    }
}

impl RsvpCodeIssuer {
    pub fn new(store: Arc<dyn GuestStore>) -> Self {
        Self::with_generator(store, shared::crypto::generate_rsvp_code)
    }

    pub fn with_generator<F>(store: Arc<dyn GuestStore>, generate: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            store,
            generate: Arc::new(generate),
        }
    }

    pub fn store(&self) -> &Arc<dyn GuestStore> {
        &self.store
    }

    /// Issues a code for `group` and returns the updated group.
    ///
    /// Fails with `AlreadyIssued` without writing if the group, as given or
    /// as stored, already carries a code.
    pub async fn issue_code(&self, group: &GuestGroup) -> Result<GuestGroup, IssueError> {
        if group.has_code() {
            return Err(IssueError::AlreadyIssued(group.id));
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = (self.generate)();
            match self.store.set_code_if_absent(group.id, &code).await {
                Ok(CodeWrite::Written(updated)) => {
                    info!(group_id = %group.id, "RSVP code issued");
                    return Ok(updated);
                }
                Ok(CodeWrite::AlreadySet(_)) => {
                    return Err(IssueError::AlreadyIssued(group.id));
                }
                Err(StoreError::CodeCollision) => {
                    warn!(group_id = %group.id, attempt, "RSVP code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::CodeCollision.into())
    }

    /// Loads the group from the store and issues a code for it.
    pub async fn issue_code_by_id(&self, id: Uuid) -> Result<GuestGroup, IssueError> {
        let group = self
            .store
            .find_group(id)
            .await?
            .ok_or(IssueError::NotFound(id))?;
        self.issue_code(&group).await
    }

    /// Issues codes for each id independently; failures do not stop the rest.
    pub async fn issue_codes(&self, ids: &[Uuid]) -> BulkIssueReport {
        let mut report = BulkIssueReport::default();

        for &id in ids {
            match self.issue_code_by_id(id).await {
                Ok(group) => report.issued.push(group),
                Err(e) => {
                    warn!(group_id = %id, error = %e, "RSVP code issuance failed");
                    report.failed.push((id, e));
                }
            }
        }

        info!(
            issued = report.issued.len(),
            failed = report.failed.len(),
            "Bulk RSVP code issuance finished"
        );
        report
    }
}
