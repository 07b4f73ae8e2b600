//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the slotbook
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! A booking conflict maps to `409 Conflict`: the caller is expected to
//! re-query available slots and pick a different one, never to retry the
//! same slot.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slotbook_core::errors::BookingError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `BookingError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BookingError::Authorization(_) => StatusCode::FORBIDDEN,
            BookingError::SlotUnavailable(_) => StatusCode::CONFLICT,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Allows using `?` with functions that return `Result<T, BookingError>`
/// inside handlers that return `Result<T, AppError>`.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Wraps plain eyre reports (repository failures) as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError to an HTTP response directly.
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
