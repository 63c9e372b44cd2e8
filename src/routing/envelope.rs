//! JSON payloads returned by the router.

use serde::{Deserialize, Serialize};

use crate::registry::UserRecord;

pub const MSG_REGISTERED: &str = "User registered successfully";
pub const MSG_AUTHENTICATED: &str = "Authentication successful";
pub const MSG_INVALID_INPUT: &str = "Username and face data required";
pub const MSG_ALREADY_EXISTS: &str = "Username already exists";
pub const MSG_NOT_FOUND: &str = "User not found";
pub const MSG_PERSIST_FAILED: &str = "Failed to persist user registry";
pub const MSG_INTERNAL: &str = "Internal server error";

/// `GET /api/status` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

impl StatusPayload {
    pub fn running() -> Self {
        Self {
            status: "running".to_string(),
        }
    }
}

/// Public view of a user: never includes face data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

impl From<&UserRecord> for UserSummary {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.to_string(),
            username: record.username.clone(),
        }
    }
}

/// Register/login outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl AuthEnvelope {
    pub fn success(message: &str, record: &UserRecord) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            user: Some(record.into()),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            user: None,
        }
    }
}

/// Payload for requests that could not be interpreted at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_omits_user() {
        let json = serde_json::to_string(&AuthEnvelope::failure(MSG_ALREADY_EXISTS)).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"Username already exists"}"#);
    }

    #[test]
    fn success_exposes_id_and_username_only() {
        let record = UserRecord::new("alice", "secret-face");
        let value = serde_json::to_value(AuthEnvelope::success(MSG_REGISTERED, &record)).unwrap();

        assert_eq!(value["user"]["id"], record.id.to_string());
        assert_eq!(value["user"]["username"], "alice");
        assert_eq!(value["user"].as_object().unwrap().len(), 2);
        assert!(!value.to_string().contains("secret-face"));
    }
}
