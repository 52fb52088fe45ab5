//! Guest store abstraction.
//!
//! The store is the source of truth for guest groups. Implementations must
//! make `set_code_if_absent` a single conditional write so that concurrent
//! issuers cannot both succeed.

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Guest, GuestGroup, NewGuestGroup};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Guest group not found: {0}")]
    NotFound(Uuid),

    #[error("RSVP code already assigned to another group")]
    CodeCollision,
}

/// Outcome of a conditional code write.
#[derive(Debug, Clone)]
pub enum CodeWrite {
    /// The code was stored; carries the updated group.
    Written(GuestGroup),
    /// The group already had a code; carries the group unchanged.
    AlreadySet(GuestGroup),
}

#[async_trait::async_trait]
pub trait GuestStore: Send + Sync {
    /// All groups in creation order.
    async fn list_groups(&self) -> Result<Vec<GuestGroup>, StoreError>;

    async fn find_group(&self, id: Uuid) -> Result<Option<GuestGroup>, StoreError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<GuestGroup>, StoreError>;

    /// Creates a group without a code; the store assigns the id.
    async fn create_group(&self, group: NewGuestGroup) -> Result<GuestGroup, StoreError>;

    /// Stores `code` only if the group has none yet.
    async fn set_code_if_absent(&self, id: Uuid, code: &str) -> Result<CodeWrite, StoreError>;

    /// Replaces the guest list of a group with answered guests.
    async fn record_responses(
        &self,
        id: Uuid,
        guests: Vec<Guest>,
    ) -> Result<GuestGroup, StoreError>;

    /// Cheap connectivity check for health probes.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Guest store kept in process memory.
///
/// Used for local development (`storage.backend = "memory"`) and tests.
#[derive(Debug, Default)]
pub struct MemoryGuestStore {
    groups: RwLock<Vec<GuestGroup>>,
}

impl MemoryGuestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with groups.
    pub fn with_groups(groups: Vec<GuestGroup>) -> Self {
        Self {
            groups: RwLock::new(groups),
        }
    }
}

#[async_trait::async_trait]
impl GuestStore for MemoryGuestStore {
    async fn list_groups(&self) -> Result<Vec<GuestGroup>, StoreError> {
        Ok(self.groups.read().await.clone())
    }

    async fn find_group(&self, id: Uuid) -> Result<Option<GuestGroup>, StoreError> {
        Ok(self.groups.read().await.iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<GuestGroup>, StoreError> {
        Ok(self
            .groups
            .read()
            .await
            .iter()
            .find(|g| g.rsvp_code.as_deref() == Some(code))
            .cloned())
    }

    async fn create_group(&self, group: NewGuestGroup) -> Result<GuestGroup, StoreError> {
        let now = Utc::now();
        let created = GuestGroup {
            id: Uuid::new_v4(),
            group_invite: group.group_invite,
            contact: group.contact,
            guests: group.guests,
            rsvp_code: None,
            created_at: now,
            updated_at: now,
        };
        self.groups.write().await.push(created.clone());
        Ok(created)
    }

    async fn set_code_if_absent(&self, id: Uuid, code: &str) -> Result<CodeWrite, StoreError> {
        // Check and write under one lock
        let mut groups = self.groups.write().await;

        if groups
            .iter()
            .any(|g| g.id != id && g.rsvp_code.as_deref() == Some(code))
        {
            return Err(StoreError::CodeCollision);
        }

        let group = groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if group.has_code() {
            return Ok(CodeWrite::AlreadySet(group.clone()));
        }

        group.rsvp_code = Some(code.to_string());
        group.updated_at = Utc::now();
        Ok(CodeWrite::Written(group.clone()))
    }

    async fn record_responses(
        &self,
        id: Uuid,
        guests: Vec<Guest>,
    ) -> Result<GuestGroup, StoreError> {
        let mut groups = self.groups.write().await;
        let group = groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(StoreError::NotFound(id))?;

        group.guests = guests;
        group.updated_at = Utc::now();
        Ok(group.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
