//! Input DTOs with garde validation for dashboard operations.
//!
//! These structs validate user-supplied data before it reaches the store.

use garde::Validate;
use serde::{Deserialize, Serialize};

use super::conversation::ConversationStatus;

/// Validation constants
const MAX_AGENT_ID_LENGTH: usize = 128;
const MAX_MESSAGE_LENGTH: usize = 10000;

/// Input for sending a message to the selected conversation.
#[derive(Debug, Validate)]
#[garde(context(()))]
pub struct SendMessageInput {
    #[garde(length(min = 1, max = MAX_MESSAGE_LENGTH))]
    pub content: String,
}

/// Partial update for a conversation's status and/or assignee.
/// Serialized as the `PUT /conversations/{id}` request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[garde(context(()))]
#[serde(rename_all = "camelCase")]
pub struct UpdateConversationInput {
    #[garde(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ConversationStatus>,
    #[garde(inner(length(min = 1, max = MAX_AGENT_ID_LENGTH)))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
}

impl UpdateConversationInput {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assigned_to_id.is_none()
    }
}

/// Helper trait to convert garde validation errors to String
pub trait ValidateExt {
    fn validate_input(&self) -> Result<(), String>;
}

impl<T: Validate<Context = ()>> ValidateExt for T {
    fn validate_input(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message_rejects_empty_content() {
        let input = SendMessageInput {
            content: String::new(),
        };
        assert!(input.validate_input().is_err());
    }

    #[test]
    fn send_message_rejects_oversized_content() {
        let input = SendMessageInput {
            content: "x".repeat(MAX_MESSAGE_LENGTH + 1),
        };
        assert!(input.validate_input().is_err());
    }

    #[test]
    fn send_message_accepts_normal_content() {
        let input = SendMessageInput {
            content: "ok, got it".to_string(),
        };
        assert!(input.validate_input().is_ok());
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let input = UpdateConversationInput {
            status: Some(ConversationStatus::Resolved),
            assigned_to_id: None,
        };
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, r#"{"status":"RESOLVED"}"#);

        let input = UpdateConversationInput {
            status: None,
            assigned_to_id: Some("agent-1".to_string()),
        };
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, r#"{"assignedToId":"agent-1"}"#);
    }

    #[test]
    fn update_rejects_blank_assignee_id() {
        let input = UpdateConversationInput {
            status: None,
            assigned_to_id: Some(String::new()),
        };
        assert!(input.validate_input().is_err());
    }

    #[test]
    fn update_is_empty_detects_no_op() {
        let input = UpdateConversationInput {
            status: None,
            assigned_to_id: None,
        };
        assert!(input.is_empty());
    }
}
