use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use edgecoach::CoachError;
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// Wraps the errors a handler can return so they convert into HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the `edgecoach` pipeline.
    Coach(CoachError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<CoachError> for AppError {
    fn from(err: CoachError) -> Self {
        AppError::Coach(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Coach(CoachError::InvalidRequest(msg)) => {
                warn!("Rejected chat request: {msg}");
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Coach(err) => {
                error!("CoachError: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
