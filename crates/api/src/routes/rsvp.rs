//! Public RSVP endpoints reached through a guest's code.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{GuestGroup, RsvpInvitation, RsvpSubmission};
use shared::crypto::is_rsvp_code_format;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::middleware::metrics::record_rsvp_submitted;

/// Resolves a code to its group. Malformed codes are treated as unknown.
async fn find_invited_group(state: &AppState, code: &str) -> Result<GuestGroup, ApiError> {
    let not_found = || ApiError::NotFound("No invitation matches this code".to_string());

    if !is_rsvp_code_format(code) {
        return Err(not_found());
    }

    state.store.find_by_code(code).await?.ok_or_else(not_found)
}

/// GET /api/v1/rsvp/:code
pub async fn get_invitation(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<RsvpInvitation>, ApiError> {
    let group = find_invited_group(&state, &code).await?;
    Ok(Json(RsvpInvitation::from(&group)))
}

/// POST /api/v1/rsvp/:code
///
/// Answers replace any earlier ones for the whole group.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiJson(submission): ApiJson<RsvpSubmission>,
) -> Result<Json<RsvpInvitation>, ApiError> {
    submission.validate()?;

    let group = find_invited_group(&state, &code).await?;
    let guests = submission.apply_to(&group)?;
    let coming = guests.iter().filter(|g| g.coming == Some(true)).count();
    let total = guests.len();

    let updated = state.store.record_responses(group.id, guests).await?;

    record_rsvp_submitted(total);
    info!(
        group_id = %updated.id,
        guests = total,
        coming = coming,
        "RSVP submitted"
    );

    Ok(Json(RsvpInvitation::from(&updated)))
}
