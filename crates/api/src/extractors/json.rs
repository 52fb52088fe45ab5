//! JSON body extractor with API-style rejections.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Like [`Json`], but malformed bodies, unknown fields and wrong content
/// types are reported as `400 validation_error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Payload {
        name: String,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            post(|ApiJson(payload): ApiJson<Payload>| async move { payload.name }),
        )
    }

    async fn post_body(body: &'static str) -> StatusCode {
        app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_valid_body() {
        assert_eq!(post_body(r#"{"name":"Ann"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_field_is_bad_request() {
        assert_eq!(
            post_body(r#"{"name":"Ann","extra":1}"#).await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        assert_eq!(post_body("{not json").await, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_rejection_maps_to_validation() {
        let error = ApiError::Validation("Failed to parse".to_string());
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
