//! User account types for Parley.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user and owner of one chat log.
///
/// `token_hash` is the SHA-256 hex digest of the user's API token; the
/// plaintext token is shown once at creation and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialize_hides_token_hash() {
        let user = User {
            id: Uuid::now_v7(),
            username: "ada".to_string(),
            token_hash: "deadbeef".to_string(),
            created_at: Utc::now(),
            last_seen_at: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("ada"));
        assert!(!json.contains("deadbeef"));
    }
}
