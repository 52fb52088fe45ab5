//! Selection of guest groups for bulk RSVP code issuance.

use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

use super::guest_group::GuestGroup;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Guest group {0} already has an RSVP code")]
    AlreadyIssued(Uuid),
}

/// Set of selected group ids. Only groups without a code can be added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<Uuid>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `group`. Returns whether it is now selected.
    ///
    /// Adding a group that already has a code is rejected; removing one is
    /// always allowed.
    pub fn toggle(&mut self, group: &GuestGroup) -> Result<bool, SelectionError> {
        if self.ids.remove(&group.id) {
            return Ok(false);
        }
        if group.has_code() {
            return Err(SelectionError::AlreadyIssued(group.id));
        }
        self.ids.insert(group.id);
        Ok(true)
    }

    /// Replaces the selection with every group that has no code yet.
    pub fn select_all_eligible(&mut self, groups: &[GuestGroup]) {
        self.ids = groups
            .iter()
            .filter(|g| !g.has_code())
            .map(|g| g.id)
            .collect();
    }

    /// Drops ids that are unknown or already coded in `groups`.
    pub fn retain_eligible(&mut self, groups: &[GuestGroup]) {
        self.ids
            .retain(|id| groups.iter().any(|g| g.id == *id && !g.has_code()));
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.ids.iter().copied()
    }

    /// Empties the selection, returning what was selected.
    pub fn take(&mut self) -> Vec<Uuid> {
        std::mem::take(&mut self.ids).into_iter().collect()
    }
}
