//! Handler-boundary error taxonomy and the JSON error envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tally_store::StoreError;
use tracing::error;

/// JSON body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Everything a handler can fail with. Each variant maps to exactly one
/// status code; store failures keep their message as `details` in the
/// envelope. Nothing propagates past [`IntoResponse`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Title is required")]
    InvalidTitle,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("TODO not found")]
    NotFound,

    #[error("{context}: {details}")]
    Internal {
        context: &'static str,
        details: String,
    },
}

impl ApiError {
    /// Map a repository error, tagging unclassified store failures with the
    /// route-specific message the envelope carries as `error`.
    pub fn from_store(err: StoreError, context: &'static str) -> Self {
        match err {
            StoreError::InvalidInput(_) => Self::InvalidTitle,
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::Forbidden(_) => Self::Forbidden,
            StoreError::Kv(e) => Self::Internal {
                context,
                details: e.to_string(),
            },
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidTitle => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Internal { context, details } => {
                error!(%details, "{context}");
                ErrorBody {
                    error: context.to_string(),
                    details: Some(details),
                }
            }
            other => ErrorBody {
                error: other.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use tally_core::item::ValidationError;
    use tally_store::{KvError, StoreError};

    #[test]
    fn store_errors_map_to_the_documented_statuses() {
        let cases = [
            (
                StoreError::InvalidInput(ValidationError::EmptyTitle),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::NotFound("x".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::Forbidden("x".to_string()),
                StatusCode::FORBIDDEN,
            ),
            (
                StoreError::Kv(KvError::Unavailable("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (store_err, expected) in cases {
            let api_err = ApiError::from_store(store_err, "Failed to fetch TODOs");
            assert_eq!(api_err.status(), expected);
        }
    }

    #[test]
    fn internal_errors_keep_the_store_message_as_details() {
        let err = ApiError::from_store(
            StoreError::Kv(KvError::Unavailable("connection refused".to_string())),
            "Failed to create TODO",
        );
        match err {
            ApiError::Internal { context, details } => {
                assert_eq!(context, "Failed to create TODO");
                assert!(details.contains("connection refused"));
            }
            other => panic!("expected Internal, got {other:?}"),
        }
    }
}
