//! Chat HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/users/{id}/chat - Append a message, reply, return the log
//! - GET    /api/v1/users/{id}/chat - Return the stored log verbatim
//! - DELETE /api/v1/users/{id}/chat - Clear the log
//!
//! Every endpoint requires the path identity to match the authenticated
//! identity; a mismatch is a permission error, never not-found.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use parley_types::chat::ChatTurn;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthenticatedUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for the send-message endpoint.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// The user message to append to the chat log.
    pub message: String,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// Reject requests whose path identity differs from the authenticated one.
fn ensure_same_user(auth: &AuthenticatedUser, user_id: &Uuid) -> Result<(), AppError> {
    if auth.user_id != *user_id {
        return Err(AppError::Forbidden(
            "Chat log belongs to a different user".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/users/{id}/chat - Append a message and reply.
///
/// Loads the stored log, appends the user turn, runs the active reply
/// generator, appends the assistant turn, persists, and returns the full
/// updated conversation.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(user_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<Vec<ChatTurn>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let user_id = parse_uuid(&user_id)?;
    ensure_same_user(&auth, &user_id)?;

    if body.message.trim().is_empty() {
        return Err(AppError::Validation("Message must not be empty".to_string()));
    }

    let log = state
        .chat_service
        .append_and_reply(user_id, body.message)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(log, request_id, elapsed)
        .with_link("self", &format!("/api/v1/users/{user_id}/chat"));

    Ok(Json(resp))
}

/// GET /api/v1/users/{id}/chat - Return the stored conversation verbatim.
pub async fn list_history(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatTurn>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let user_id = parse_uuid(&user_id)?;
    ensure_same_user(&auth, &user_id)?;

    let log = state
        .chat_service
        .history(user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(log, request_id, elapsed)
        .with_link("self", &format!("/api/v1/users/{user_id}/chat"));

    Ok(Json(resp))
}

/// DELETE /api/v1/users/{id}/chat - Clear the stored conversation.
pub async fn clear_history(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let user_id = parse_uuid(&user_id)?;
    ensure_same_user(&auth, &user_id)?;

    state
        .chat_service
        .clear(user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"cleared": true, "user_id": user_id.to_string()}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        assert!(parse_uuid("not-a-uuid").is_err());
        assert!(parse_uuid(&Uuid::now_v7().to_string()).is_ok());
    }

    #[test]
    fn test_ensure_same_user_accepts_owner() {
        let user_id = Uuid::now_v7();
        let auth = AuthenticatedUser { user_id };
        assert!(ensure_same_user(&auth, &user_id).is_ok());
    }

    #[test]
    fn test_ensure_same_user_rejects_mismatch_as_forbidden() {
        let auth = AuthenticatedUser {
            user_id: Uuid::now_v7(),
        };
        let other = Uuid::now_v7();
        match ensure_same_user(&auth, &other) {
            Err(AppError::Forbidden(_)) => {}
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }
}
