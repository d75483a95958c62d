//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Reply-generation failures never appear here: generators absorb them into
//! displayable text. Only identity, validation, and persistence errors cross
//! the HTTP boundary.

use axum::response::{IntoResponse, Response};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failure (identity could not be resolved).
    Unauthorized(String),
    /// Permission failure (resolved identity does not own the resource).
    Forbidden(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error, carrying the underlying message for diagnostics.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::Unauthorized(msg) => ("UNAUTHORIZED", msg),
            AppError::Forbidden(msg) => ("FORBIDDEN", msg),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg),
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg),
        };

        ApiResponse::<()>::error(code, &message, String::new(), 0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_forbidden_maps_to_403() {
        let response = AppError::Forbidden("not yours".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = AppError::Unauthorized("no token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("bad input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let response = AppError::Internal("db down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
