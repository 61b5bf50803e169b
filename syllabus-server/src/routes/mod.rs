pub mod calendar;
pub mod events;
pub mod extract;
pub mod tasks;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use syllabus_core::SyllabusError;
use tracing::{error, warn};

use crate::state::AppState;

/// All API routes
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(extract::router())
        .merge(events::router())
        .merge(calendar::router())
        .merge(tasks::router())
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Errors rendered as JSON, with a status derived from the underlying
/// [`SyllabusError`] when there is one.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    raw: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        AppError {
            status,
            message: message.into(),
            raw: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.message,
            raw: self.raw,
        });
        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        let (status, raw) = match err.downcast_ref::<SyllabusError>() {
            Some(SyllabusError::UnsupportedFormat(_) | SyllabusError::ExtractionFailed(_)) => {
                (StatusCode::BAD_REQUEST, None)
            }
            Some(SyllabusError::Unauthorized(_)) => (StatusCode::UNAUTHORIZED, None),
            Some(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.raw().map(str::to_string)),
            None => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        AppError {
            status,
            message: err.to_string(),
            raw,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_follows_syllabus_error() {
        let unsupported = AppError::from(SyllabusError::UnsupportedFormat("image/png".to_string()));
        let unauthorized = AppError::from(SyllabusError::Unauthorized("expired".to_string()));
        let other = AppError::from(anyhow::anyhow!("boom"));

        assert_eq!(unsupported.status, StatusCode::BAD_REQUEST);
        assert_eq!(unsupported.message, "Unsupported file type: image/png");
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
        assert_eq!(other.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_malformed_output_carries_raw_text() {
        let err = AppError::from(SyllabusError::MalformedOutput {
            message: "expected value".to_string(),
            raw: "not json".to_string(),
        });

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.raw.as_deref(), Some("not json"));
    }
}
