//! Admin guest group endpoints: roster, creation and RSVP code issuance.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{rsvp_link, CreateGuestGroupRequest, GuestGroup, RosterView};
use domain::services::{Dashboard, DashboardError, IssueError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson};
use crate::middleware::metrics::{
    record_guest_group_created, record_rsvp_code_rejected, record_rsvp_codes_issued,
};

/// A freshly issued code with its shareable link.
#[derive(Debug, Serialize)]
pub struct IssuedCodeResponse {
    pub id: Uuid,
    pub group_invite: String,
    pub rsvp_code: String,
    pub rsvp_link: String,
}

impl IssuedCodeResponse {
    fn new(group: GuestGroup, origin: &str) -> Self {
        let rsvp_code = group.rsvp_code.unwrap_or_default();
        Self {
            id: group.id,
            group_invite: group.group_invite,
            rsvp_link: rsvp_link(origin, &rsvp_code),
            rsvp_code,
        }
    }
}

/// Bulk issuance target: explicit ids or every group without a code.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkIssueRequest {
    #[serde(default)]
    pub group_ids: Vec<Uuid>,
    #[serde(default)]
    pub all_eligible: bool,
}

#[derive(Debug, Serialize)]
pub struct FailedIssue {
    pub id: Uuid,
    pub error: &'static str,
    pub message: String,
}

impl FailedIssue {
    fn new(id: Uuid, err: &IssueError) -> Self {
        let error = match err {
            IssueError::AlreadyIssued(_) => "already_issued",
            IssueError::NotFound(_) => "not_found",
            IssueError::StoreUnavailable(_) => "store_unavailable",
        };
        Self {
            id,
            error,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BulkIssueResponse {
    pub issued: Vec<IssuedCodeResponse>,
    pub failed: Vec<FailedIssue>,
    pub roster: RosterView,
}

/// GET /api/v1/admin/roster
pub async fn get_roster(State(state): State<AppState>) -> Result<Json<RosterView>, ApiError> {
    let dashboard = Dashboard::load(state.issuer.clone()).await?;
    Ok(Json(
        dashboard.view().with_links(&state.config.server.public_origin),
    ))
}

/// GET /api/v1/admin/guest-groups/:id
pub async fn get_guest_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GuestGroup>, ApiError> {
    let group = state
        .store
        .find_group(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Guest group {} not found", id)))?;
    Ok(Json(group))
}

/// POST /api/v1/admin/guest-groups
pub async fn create_guest_group(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    ApiJson(request): ApiJson<CreateGuestGroupRequest>,
) -> Result<(StatusCode, Json<GuestGroup>), ApiError> {
    let mut dashboard = Dashboard::load(state.issuer.clone()).await?;
    let created = dashboard.add_group(request).await?;

    record_guest_group_created();
    info!(
        group_id = %created.id,
        admin = %session.subject,
        "Guest group created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/v1/admin/guest-groups/:id/rsvp-code
///
/// 409 when the group already has a code; the stored code is left as is.
pub async fn issue_rsvp_code(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<IssuedCodeResponse>), ApiError> {
    let mut dashboard = Dashboard::load(state.issuer.clone()).await?;

    let group = match dashboard.issue_code(id).await {
        Ok(group) => group,
        Err(DashboardError::Issue(e @ IssueError::AlreadyIssued(_))) => {
            record_rsvp_code_rejected("already_issued");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    record_rsvp_codes_issued(1);
    info!(group_id = %id, admin = %session.subject, "RSVP code issued");

    Ok((
        StatusCode::CREATED,
        Json(IssuedCodeResponse::new(
            group,
            &state.config.server.public_origin,
        )),
    ))
}

/// POST /api/v1/admin/guest-groups/rsvp-codes
///
/// Issues codes one group at a time. Rejected or failed groups are listed
/// in `failed` and do not stop the others.
pub async fn issue_rsvp_codes(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    ApiJson(request): ApiJson<BulkIssueRequest>,
) -> Result<Json<BulkIssueResponse>, ApiError> {
    if request.all_eligible == !request.group_ids.is_empty() {
        return Err(ApiError::Validation(
            "Provide either group_ids or all_eligible".to_string(),
        ));
    }

    let mut dashboard = Dashboard::load(state.issuer.clone()).await?;
    let mut failed = Vec::new();

    if request.all_eligible {
        dashboard.select_all_eligible();
    } else {
        let ids: BTreeSet<Uuid> = request.group_ids.into_iter().collect();
        for id in ids {
            let rejected = match dashboard.toggle(id) {
                Ok(_) => None,
                Err(DashboardError::Selection(_)) => Some(IssueError::AlreadyIssued(id)),
                Err(DashboardError::NotFound(_)) => Some(IssueError::NotFound(id)),
                Err(e) => return Err(e.into()),
            };
            if let Some(err) = rejected {
                failed.push(FailedIssue::new(id, &err));
            }
        }
    }

    let report = dashboard.issue_for_selection().await;
    failed.extend(report.failed.iter().map(|(id, e)| FailedIssue::new(*id, e)));

    let origin = &state.config.server.public_origin;
    record_rsvp_codes_issued(report.issued.len());
    info!(
        admin = %session.subject,
        issued = report.issued.len(),
        failed = failed.len(),
        "Bulk RSVP code issuance"
    );

    Ok(Json(BulkIssueResponse {
        issued: report
            .issued
            .into_iter()
            .map(|group| IssuedCodeResponse::new(group, origin))
            .collect(),
        failed,
        roster: dashboard.view().with_links(origin),
    }))
}
