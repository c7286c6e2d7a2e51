use serde::{Deserialize, Serialize};

use super::agent::AssignedAgent;

/// Lifecycle status of a support conversation.
///
/// The store accepts any transition, including backwards ones such as
/// `CLOSED -> OPEN` (manual reopen); no state machine is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConversationStatus {
   Open,
   Pending,
   Resolved,
   Closed,
}

impl ConversationStatus {
   pub fn as_str(&self) -> &'static str {
      match self {
         ConversationStatus::Open => "OPEN",
         ConversationStatus::Pending => "PENDING",
         ConversationStatus::Resolved => "RESOLVED",
         ConversationStatus::Closed => "CLOSED",
      }
   }

   pub fn parse(value: &str) -> Option<Self> {
      match value {
         "OPEN" => Some(ConversationStatus::Open),
         "PENDING" => Some(ConversationStatus::Pending),
         "RESOLVED" => Some(ConversationStatus::Resolved),
         "CLOSED" => Some(ConversationStatus::Closed),
         _ => None,
      }
   }
}

/// The customer/visitor who owns the conversation.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
   pub id: String,
   pub name: String,
   pub email: Option<String>,
   pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
   pub id: String,
   pub subject: Option<String>,
   pub status: ConversationStatus,
   pub priority: i32,
   pub unread_count: i32,
   pub last_message_at: Option<i64>,
   pub customer: Customer,
   pub assigned_to: Option<AssignedAgent>,
}

/// Partial conversation returned by the store after a `PUT` update.
/// Only the fields the store actually changed are present.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPatch {
   pub id: String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub status: Option<ConversationStatus>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub assigned_to: Option<AssignedAgent>,
}
