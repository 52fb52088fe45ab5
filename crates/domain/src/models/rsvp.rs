//! Public RSVP: what a guest sees behind their code and what they submit.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use super::guest::{BusTime, Guest};
use super::guest_group::GuestGroup;

/// Builds the public RSVP link for a code: `<origin>/?code=<code>`.
pub fn rsvp_link(origin: &str, code: &str) -> String {
    format!("{}/?code={}", origin.trim_end_matches('/'), code)
}

/// Group details exposed to the holder of an RSVP code.
///
/// Leaves out the store id and the contact details.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpInvitation {
    pub group_invite: String,
    pub guests: Vec<Guest>,
    pub responded: bool,
}

impl From<&GuestGroup> for RsvpInvitation {
    fn from(group: &GuestGroup) -> Self {
        Self {
            group_invite: group.group_invite.clone(),
            guests: group.guests.clone(),
            responded: group.has_responded(),
        }
    }
}

/// Answer for one guest, in the group's display order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct GuestResponse {
    pub coming: bool,
    #[serde(default)]
    pub bus_time: Option<BusTime>,
}

/// Answers for a whole group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RsvpSubmission {
    #[validate(length(min = 1, max = 20, message = "guests must contain 1-20 answers"))]
    #[validate(nested)]
    pub guests: Vec<GuestResponse>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RsvpError {
    #[error("Expected {expected} answers, got {actual}")]
    GuestCountMismatch { expected: usize, actual: usize },
}

impl RsvpSubmission {
    /// Produces the group's guest list with the submitted answers applied.
    ///
    /// Names always come from the stored group; one answer per guest is required.
    pub fn apply_to(&self, group: &GuestGroup) -> Result<Vec<Guest>, RsvpError> {
        if self.guests.len() != group.guests.len() {
            return Err(RsvpError::GuestCountMismatch {
                expected: group.guests.len(),
                actual: self.guests.len(),
            });
        }

        Ok(group
            .guests
            .iter()
            .zip(&self.guests)
            .map(|(guest, answer)| Guest {
                full_name: guest.full_name.clone(),
                coming: Some(answer.coming),
                bus_time: answer.bus_time,
            })
            .collect())
    }
}
