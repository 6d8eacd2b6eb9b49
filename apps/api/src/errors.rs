use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::profile::ProfileError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            e @ ProfileError::UnreadableDocument { .. } => AppError::UnreadableDocument(e.to_string()),
            e @ ProfileError::FlatLength { .. } => AppError::Validation(e.to_string()),
            ProfileError::Io(e) => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnreadableDocument(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNREADABLE_DOCUMENT",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_errors_map_to_status() {
        let unreadable = AppError::from(ProfileError::UnreadableDocument {
            attempted: "utf-8".into(),
        });
        assert_eq!(
            unreadable.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let length = AppError::from(ProfileError::FlatLength {
            expected: 24,
            found: 3,
        });
        assert_eq!(length.into_response().status(), StatusCode::BAD_REQUEST);

        let io = AppError::from(ProfileError::Io(std::io::Error::other("disk")));
        assert_eq!(io.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
