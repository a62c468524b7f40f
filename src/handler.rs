//! HTTP Handler
//!
//! TigerStyle: Thin transport adapter over the save service.
//!
//! ## Routes
//!
//! - `POST /save-data` — decode `{ "data": <base64>, "storage_type": <kind> }`
//!   and save it. Any other method gets 405 without the body being read.
//! - `GET /health` — `{ "status": "healthy" }`, never touches the service.
//!
//! ## Status mapping
//!
//! | Outcome                  | Status |
//! |--------------------------|--------|
//! | saved                    | 200    |
//! | body unreadable          | 400    |
//! | malformed JSON           | 400    |
//! | validation failure       | 400    |
//! | unsupported storage kind | 400    |
//! | persistence failure      | 500    |
//! | wrong method             | 405    |

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::constants::{HEALTH_PATH, REQUEST_BODY_BYTES_MAX, SAVE_DATA_PATH, SAVE_SUCCESS_MESSAGE};
use crate::request::SaveRequest;
use crate::service::{SaveError, SaveService};

// =============================================================================
// Router
// =============================================================================

/// Build the axum `Router` for the service.
pub fn router(service: Arc<SaveService>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .route(
            SAVE_DATA_PATH,
            post(save_data_handler).fallback(method_not_allowed_handler),
        )
        .layer(DefaultBodyLimit::max(REQUEST_BODY_BYTES_MAX))
        .with_state(service)
}

// =============================================================================
// Response Bodies
// =============================================================================

/// Body returned on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub message: String,
    pub status: String,
}

/// Body returned on any error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
}

/// Body returned by the health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /health`
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// `POST /save-data`
async fn save_data_handler(
    State(service): State<Arc<SaveService>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let body = body.map_err(|e| ApiError::UnreadableBody(e.body_text()))?;
    let req = SaveRequest::from_json(&body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;

    let receipt = service.save_data(&req).await?;
    tracing::info!(kind = %receipt.kind, bytes = receipt.bytes, "Saved payload");

    Ok(Json(SaveResponse {
        message: SAVE_SUCCESS_MESSAGE.to_string(),
        status: "success".to_string(),
    }))
}

/// Any method other than POST on `/save-data`.
async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

// =============================================================================
// Errors
// =============================================================================

/// Everything the handler can answer with besides success.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Failed to read body: {0}")]
    UnreadableBody(String),

    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    Save(#[from] SaveError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnreadableBody(_) | Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::Save(SaveError::Validation(_) | SaveError::UnsupportedStorageKind(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Save(SaveError::Persistence { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Save request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Save request rejected");
        }

        let body = ErrorResponse {
            status: "error".to_string(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::StorageKind;
    use crate::storage::{PersistenceError, UnsupportedStorageKind};
    use crate::validator::ValidationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            ApiError::InvalidJson("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SaveError::Validation(ValidationError::EmptyPayload)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SaveError::from(UnsupportedStorageKind("redis".to_string())))
                .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SaveError::Persistence {
                kind: StorageKind::Database,
                source: PersistenceError::NotConnected,
            })
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_wrapped_errors_keep_their_status() {
        // Status comes from the variant, not from the rendered message
        let err = ApiError::from(SaveError::Validation(ValidationError::EmptyPayload));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "validation failed: payload empty");

        let err = ApiError::from(SaveError::Persistence {
            kind: StorageKind::File,
            source: PersistenceError::exhausted("validation failed"),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
