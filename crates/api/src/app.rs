use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{GuestStore, RsvpCodeIssuer};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    guard_admin_pages, metrics_handler, metrics_middleware, require_admin_session,
    rsvp_rate_limit, security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{auth, guest_groups, health, pages, rsvp};
use crate::services::CookieHelper;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GuestStore>,
    pub issuer: RsvpCodeIssuer,
    pub config: Arc<Config>,
    pub cookies: CookieHelper,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn GuestStore>) -> Self {
        let rate_limiter = (config.security.rsvp_rate_limit_per_minute > 0).then(|| {
            Arc::new(RateLimiterState::new(
                config.security.rsvp_rate_limit_per_minute,
                config.security.trusted_proxies.clone(),
            ))
        });
        let cookies = CookieHelper::new(config.cookie.clone(), config.jwt.session_expiry_secs);

        Self {
            issuer: RsvpCodeIssuer::new(store.clone()),
            store,
            config: Arc::new(config),
            cookies,
            rate_limiter,
        }
    }
}

pub fn create_app(config: Config, store: Arc<dyn GuestStore>) -> Router {
    let state = AppState::new(config, store);
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        // Development: allow any origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Guests open these from their RSVP link
    let rsvp_routes = Router::new()
        .route(
            "/api/v1/rsvp/:code",
            get(rsvp::get_invitation).post(rsvp::submit_rsvp),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rsvp_rate_limit,
        ));

    let admin_routes = Router::new()
        .route("/api/v1/admin/roster", get(guest_groups::get_roster))
        .route(
            "/api/v1/admin/guest-groups",
            post(guest_groups::create_guest_group),
        )
        .route(
            "/api/v1/admin/guest-groups/:id",
            get(guest_groups::get_guest_group),
        )
        .route(
            "/api/v1/admin/guest-groups/:id/rsvp-code",
            post(guest_groups::issue_rsvp_code),
        )
        .route(
            "/api/v1/admin/guest-groups/rsvp-codes",
            post(guest_groups::issue_rsvp_codes),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_session,
        ));

    let admin_pages = Router::new()
        .route("/admin", get(pages::admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard_admin_pages,
        ));

    let auth_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/session", get(auth::session));

    let public_routes = Router::new()
        .route("/", get(pages::landing))
        .route("/login", get(pages::login))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(rsvp_routes)
        .merge(admin_pages)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
