//! Admin session middleware.
//!
//! Turns the session token (Bearer header or session cookie) into a
//! [`SessionSignal`] and lets a [`RouteGuard`] decide whether the request
//! may reach the admin area.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use domain::models::{Navigation, RouteGuard, SessionSignal};
use serde_json::json;
use shared::jwt::{JwtConfig, JwtError};
use tracing::{debug, error};

use crate::app::AppState;
use crate::config::{Config, JwtAuthConfig};

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_PAGE_PREFIX: &str = "/admin";
pub const ADMIN_API_PREFIX: &str = "/api/v1/admin";

/// Authenticated admin, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub subject: String,
    pub jti: String,
}

impl AdminSession {
    /// Builds the JWT config from the configured key pair.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, JwtError> {
        JwtConfig::with_leeway(
            &config.private_key,
            &config.public_key,
            config.session_expiry_secs,
            config.leeway_secs,
        )
    }
}

/// The guard protecting the admin page and the admin API.
pub fn admin_guard() -> RouteGuard {
    RouteGuard::new(LOGIN_PATH)
        .protect(ADMIN_PAGE_PREFIX)
        .protect(ADMIN_API_PREFIX)
}

/// Session token from `Authorization: Bearer` or the session cookie.
pub fn session_token<'a>(state: &AppState, headers: &'a HeaderMap) -> Option<&'a str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .or_else(|| state.cookies.extract_session_token(headers))
        .filter(|token| !token.is_empty())
}

/// Classifies a token. Only tokens issued to the configured admin count.
pub fn session_signal(
    config: &Config,
    jwt: &JwtConfig,
    token: Option<&str>,
) -> (SessionSignal, Option<AdminSession>) {
    let Some(token) = token else {
        return (SessionSignal::SignedOut, None);
    };

    match jwt.validate_session_token(token) {
        Ok(claims) if claims.sub.eq_ignore_ascii_case(&config.admin.email) => {
            let session = AdminSession {
                subject: claims.sub.clone(),
                jti: claims.jti,
            };
            (
                SessionSignal::SignedIn {
                    subject: claims.sub,
                },
                Some(session),
            )
        }
        Ok(claims) => {
            debug!(subject = %claims.sub, "Session token for unknown subject");
            (SessionSignal::SignedOut, None)
        }
        Err(JwtError::TokenExpired) => (SessionSignal::Expired, None),
        Err(e) => {
            debug!(error = %e, "Session token rejected");
            (SessionSignal::SignedOut, None)
        }
    }
}

/// Resolves the request's session, observing it on a fresh guard.
fn evaluate(
    state: &AppState,
    req: &Request<Body>,
) -> Result<(RouteGuard, Option<AdminSession>), Response> {
    let jwt = AdminSession::create_jwt_config(&state.config.jwt).map_err(|e| {
        error!(error = %e, "Failed to create JWT config");
        internal_error_response("Authentication service unavailable")
    })?;

    let token = session_token(state, req.headers());
    let (signal, session) = session_signal(&state.config, &jwt, token);
    let mut guard = admin_guard();
    guard.observe(signal);
    Ok((guard, session))
}

/// Rejects unauthenticated admin API calls with 401.
pub async fn require_admin_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let (guard, session) = match evaluate(&state, &req) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    match (guard.navigate(req.uri().path()), session) {
        (Navigation::Allow, Some(session)) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        _ => unauthorized_response("Admin session required"),
    }
}

/// Sends unauthenticated visitors of admin pages to the login page.
pub async fn guard_admin_pages(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (guard, _) = match evaluate(&state, &req) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    match guard.navigate(req.uri().path()) {
        Navigation::Allow => next.run(req).await,
        Navigation::Redirect(to) => Redirect::to(&to).into_response(),
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}
