//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::describe::DescribeError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Model collaborator unreachable: {0}")]
    UpstreamUnavailable(String),
    #[error("Model collaborator produced no usable content: {0}")]
    UpstreamUnusable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::UpstreamUnavailable(detail) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                detail.clone(),
            ),
            ApiError::UpstreamUnusable(detail) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNUSABLE",
                detail.clone(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DescribeError> for ApiError {
    fn from(err: DescribeError) -> Self {
        if err.is_transport() {
            ApiError::UpstreamUnavailable(err.to_string())
        } else if err.is_unusable_content() {
            ApiError::UpstreamUnusable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::BadRequest("unknown mode 'x'".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"].as_str().unwrap().contains("unknown mode"));
    }

    #[tokio::test]
    async fn upstream_unavailable_returns_502() {
        let response =
            ApiError::UpstreamUnavailable("generator is not reachable".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "UPSTREAM_UNAVAILABLE");
    }

    #[tokio::test]
    async fn upstream_unusable_returns_502() {
        let response = ApiError::UpstreamUnusable("no JSON".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "UPSTREAM_UNUSABLE");
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let response = ApiError::Internal("lock poisoned".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[test]
    fn transport_errors_map_to_unavailable() {
        let api: ApiError = DescribeError::GeneratorConnection("http://localhost:11434".into()).into();
        assert!(matches!(api, ApiError::UpstreamUnavailable(_)));

        let api: ApiError = DescribeError::GeneratorTimeout(90).into();
        assert!(matches!(api, ApiError::UpstreamUnavailable(_)));
    }

    #[test]
    fn content_errors_map_to_unusable() {
        let api: ApiError = DescribeError::NoJsonFound.into();
        assert!(matches!(api, ApiError::UpstreamUnusable(_)));

        let api: ApiError = DescribeError::UnusableOutput("empty".into()).into();
        assert!(matches!(api, ApiError::UpstreamUnusable(_)));
    }

    #[test]
    fn other_errors_map_to_internal() {
        let api: ApiError = DescribeError::ModelInit("bad onnx".into()).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }
}
