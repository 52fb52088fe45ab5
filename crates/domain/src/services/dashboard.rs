//! Admin dashboard service.
//!
//! Holds the roster and the bulk selection for one admin session. Local
//! state changes only after the store confirms a write.

use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use super::issuer::{BulkIssueReport, IssueError, RsvpCodeIssuer};
use super::store::StoreError;
use crate::models::{
    CreateGuestGroupRequest, GuestGroup, Roster, RosterView, Selection, SelectionError,
};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Issue(#[from] IssueError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Guest group not found: {0}")]
    NotFound(Uuid),
}

#[derive(Debug)]
pub struct Dashboard {
    issuer: RsvpCodeIssuer,
    roster: Roster,
    selection: Selection,
}

impl Dashboard {
    /// Loads every guest group from the store.
    pub async fn load(issuer: RsvpCodeIssuer) -> Result<Self, StoreError> {
        let groups = issuer.store().list_groups().await.map_err(|e| {
            error!(error = %e, "Failed to load guest groups");
            e
        })?;

        Ok(Self {
            issuer,
            roster: Roster::new(groups),
            selection: Selection::new(),
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn view(&self) -> RosterView {
        self.roster.view()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Validates and stores a new group, then appends it to the roster.
    pub async fn add_group(
        &mut self,
        request: CreateGuestGroupRequest,
    ) -> Result<GuestGroup, DashboardError> {
        request.validate()?;

        let created = self
            .issuer
            .store()
            .create_group(request.into_new_group())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to add guest group");
                e
            })?;

        info!(group_id = %created.id, guests = created.guests.len(), "Guest group added");
        self.roster = self.roster.with_added(created.clone());
        Ok(created)
    }

    /// Issues a code for one group of the roster.
    pub async fn issue_code(&mut self, id: Uuid) -> Result<GuestGroup, DashboardError> {
        let group = self.roster.find(id).ok_or(DashboardError::NotFound(id))?;
        let updated = self.issuer.issue_code(group).await?;
        self.roster = self.roster.with_patched(updated.clone());
        Ok(updated)
    }

    /// Toggles a roster group in the selection.
    pub fn toggle(&mut self, id: Uuid) -> Result<bool, DashboardError> {
        let group = self.roster.find(id).ok_or(DashboardError::NotFound(id))?;
        Ok(self.selection.toggle(group)?)
    }

    pub fn select_all_eligible(&mut self) {
        self.selection.select_all_eligible(self.roster.groups());
    }

    /// Issues codes for the selected groups and clears the selection,
    /// whatever the individual outcomes. Groups coded since they were
    /// selected are dropped rather than reported as failures.
    pub async fn issue_for_selection(&mut self) -> BulkIssueReport {
        self.selection.retain_eligible(self.roster.groups());
        let ids = self.selection.take();
        let report = self.issuer.issue_codes(&ids).await;

        for group in &report.issued {
            self.roster = self.roster.with_patched(group.clone());
        }
        report
    }
}
