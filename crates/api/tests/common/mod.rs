//! Common test utilities for integration tests.
//!
//! The router runs against the in-memory guest store, so no database is needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use domain::models::{Guest, GuestGroup};
use domain::services::MemoryGuestStore;
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};
use tower::ServiceExt;
use uuid::Uuid;
use wedding_rsvp_api::{
    app::create_app,
    config::{
        AdminConfig, Config, CookieConfig, DatabaseConfig, JwtAuthConfig, LoggingConfig,
        SecurityConfig, ServerConfig, StorageBackend, StorageConfig,
    },
};

pub const ADMIN_EMAIL: &str = "couple@example.com";
pub const ADMIN_PASSWORD: &str = "Just-Married-2026";
pub const PUBLIC_ORIGIN: &str = "https://wedding.example.com";

/// Hashing is slow, so the admin hash is computed once per test binary.
fn admin_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| shared::password::hash_password(ADMIN_PASSWORD).unwrap())
        .clone()
}

/// Test configuration: memory backend, no rate limit, insecure cookies.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            public_origin: PUBLIC_ORIGIN.to_string(),
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            rsvp_rate_limit_per_minute: 0, // Disable rate limiting for tests
            hsts_enabled: false,
            trusted_proxies: vec![],
        },
        jwt: JwtAuthConfig {
            private_key: include_str!("../fixtures/jwt_private.pem").to_string(),
            public_key: include_str!("../fixtures/jwt_public.pem").to_string(),
            session_expiry_secs: 3600,
            leeway_secs: 30,
        },
        admin: AdminConfig {
            email: ADMIN_EMAIL.to_string(),
            password_hash: admin_password_hash(),
        },
        cookie: CookieConfig {
            secure: false,
            ..CookieConfig::default()
        },
    }
}

/// Test application backed by a fresh in-memory store.
pub fn create_test_app(config: Config) -> (Router, Arc<MemoryGuestStore>) {
    create_test_app_with_groups(config, vec![])
}

pub fn create_test_app_with_groups(
    config: Config,
    groups: Vec<GuestGroup>,
) -> (Router, Arc<MemoryGuestStore>) {
    let store = Arc::new(MemoryGuestStore::with_groups(groups));
    (create_app(config, store.clone()), store)
}

/// A stored group with unanswered guests.
pub fn guest_group(invite: &str, names: &[&str], code: Option<&str>) -> GuestGroup {
    let now = chrono::Utc::now();
    GuestGroup {
        id: Uuid::new_v4(),
        group_invite: invite.to_string(),
        contact: "+1 555 0100".to_string(),
        guests: names.iter().map(|n| Guest::new(*n)).collect(),
        rsvp_code: code.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

/// Helper to create a JSON request.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Helper to create an authenticated JSON request.
pub fn authed_json_request(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    let mut request = json_request(method, uri, body);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );
    request
}

pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// Signs in as the configured admin and returns the bearer token.
pub async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    body["token"].as_str().unwrap().to_string()
}
