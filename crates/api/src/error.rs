//! API error responses
//!
//! This module maps the shared error taxonomy onto HTTP status codes
//! and JSON bodies. Upstream inference-server rejections are relayed
//! with their original status and body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use common::Error;

/// Wrapper turning sidecar errors into HTTP responses
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::InvalidArchive(_) => {
                message_response(StatusCode::BAD_REQUEST, "Invalid Zip file")
            }
            Error::VersionAlreadyExists(label) => message_response(
                StatusCode::BAD_REQUEST,
                format!("Version '{}' already exists", label),
            ),
            Error::InvalidArgument(message) => {
                message_response(StatusCode::BAD_REQUEST, message)
            }
            Error::ConfigNotFound(_) => {
                message_response(StatusCode::NOT_FOUND, "Model config file not found")
            }
            Error::VersionNotFound(_) => message_response(
                StatusCode::NOT_FOUND,
                "Version info not found in the config file",
            ),
            Error::MetaNotFound(model_name) => message_response(
                StatusCode::NOT_FOUND,
                format!("Metadata not found for model '{}'", model_name),
            ),
            Error::SemanticVersionNotFound(label) => message_response(
                StatusCode::NOT_FOUND,
                format!("Semantic version '{}' not found", label),
            ),
            Error::Upstream { status, body } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, body).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                message_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}
