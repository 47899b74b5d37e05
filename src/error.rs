use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error taxonomy for the whole HTTP surface. Every failure path ends up
/// here and is rendered as a `{"message": ...}` JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// External AI service unreachable or returned a non-success status.
    #[error("Failed to generate content")]
    Upstream(anyhow::Error),

    /// External AI service answered, but the payload was not the JSON we
    /// asked for.
    #[error("Generation failed: could not parse AI response")]
    UpstreamParse(anyhow::Error),

    #[error("Internal server error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_)
            | ApiError::UpstreamParse(_)
            | ApiError::Database(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal detail goes to the log, never to the client.
        match &self {
            ApiError::Upstream(src) | ApiError::UpstreamParse(src) => {
                error!(error = %src, "upstream AI failure");
            }
            ApiError::Database(src) => {
                error!(error = %src, "database failure");
            }
            ApiError::Internal(src) => {
                error!(error = %src, "unhandled failure");
            }
            _ => {}
        }

        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let err = ApiError::bad_request("No image uploaded");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No image uploaded");
    }

    #[test]
    fn internal_errors_hide_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("secret connection string"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn parse_failure_is_distinct_from_upstream_failure() {
        let upstream = ApiError::Upstream(anyhow::anyhow!("timeout"));
        let parse = ApiError::UpstreamParse(anyhow::anyhow!("bad json"));
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(upstream.to_string(), parse.to_string());
        assert!(parse.to_string().contains("could not parse"));
    }
}
