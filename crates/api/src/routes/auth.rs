//! Admin login, logout and session state.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use domain::models::SessionState;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::middleware::admin_session::{admin_guard, session_signal, session_token, AdminSession};
use crate::services::{AdminAuthError, AdminAuthService};

/// Request body for admin login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub subject: String,
}

/// Sign in with the configured admin account.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let jwt = AdminSession::create_jwt_config(&state.config.jwt)
        .map_err(|e| ApiError::Internal(format!("Failed to create JWT config: {}", e)))?;
    let auth_service = AdminAuthService::new(&state.config.admin, jwt);

    let login = auth_service
        .login(&request.email, &request.password)
        .map_err(|e| match e {
            AdminAuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AdminAuthError::Password(e) => ApiError::Internal(format!("Password error: {}", e)),
            AdminAuthError::Token(e) => ApiError::Internal(format!("Token error: {}", e)),
        })?;

    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &login.token);

    let response = LoginResponse {
        token: login.token,
        token_type: "Bearer".to_string(),
        expires_in: login.expires_in,
        subject: login.subject,
    };

    Ok((headers, Json(response)))
}

/// Sign out by clearing the session cookie.
///
/// POST /api/v1/auth/logout
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    state.cookies.add_clear_cookie(&mut headers);
    (StatusCode::NO_CONTENT, headers)
}

/// Current admin session as seen by the route guard.
///
/// GET /api/v1/auth/session
pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionState>, ApiError> {
    let jwt = AdminSession::create_jwt_config(&state.config.jwt)
        .map_err(|e| ApiError::Internal(format!("Failed to create JWT config: {}", e)))?;

    let (signal, _) = session_signal(&state.config, &jwt, session_token(&state, &headers));
    let mut guard = admin_guard();
    Ok(Json(guard.observe(signal).clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let request = LoginRequest {
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_login_request_invalid_email() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_empty_password() {
        let request = LoginRequest {
            email: "admin@example.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_session_state_json() {
        let state = SessionState::Authenticated {
            subject: "admin@example.com".to_string(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "authenticated");
        assert_eq!(json["subject"], "admin@example.com");
    }
}
