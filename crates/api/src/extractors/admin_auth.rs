//! Admin session extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::admin_session::{session_signal, session_token, AdminSession};

/// The signed-in admin.
///
/// Uses the session stored by `require_admin_session` when the route is
/// behind it, and validates the token itself otherwise.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub AdminSession);

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<AdminSession>() {
            return Ok(AdminAuth(session.clone()));
        }

        let jwt = AdminSession::create_jwt_config(&state.config.jwt)
            .map_err(|e| ApiError::Internal(format!("Failed to create JWT config: {}", e)))?;

        let (_, session) = session_signal(&state.config, &jwt, session_token(state, &parts.headers));
        session
            .map(AdminAuth)
            .ok_or_else(|| ApiError::Unauthorized("Admin session required".to_string()))
    }
}
