use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::SubmitReply;
use crate::store::StoreError;
use crate::submission::SubmitError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    RateLimited(String),
    Store(StoreError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::RateLimited(msg) => write!(f, "Rate Limited: {msg}"),
            AppError::Store(err) => write!(f, "Store Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            AppError::Store(err) => {
                tracing::error!("Store error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error: Failed to save data to sheet: {err}"),
                )
            }
        };

        (status, axum::Json(SubmitReply::rejected(message))).into_response()
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::MissingFields => {
                AppError::BadRequest(SubmitError::MissingFields.to_string())
            }
            SubmitError::Persistence(e) => AppError::Store(e),
        }
    }
}
