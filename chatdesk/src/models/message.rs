use serde::{Deserialize, Serialize};

/// Profile of whoever sent a message, embedded by the store when available.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SenderProfile {
   pub id: String,
   pub name: String,
   pub avatar_url: Option<String>,
   pub role: Option<String>,
}

/// A single message inside a conversation. Immutable once created;
/// ordering is by creation timestamp, with the id as tiebreaker.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Message {
   pub id: String,
   pub content: String,
   pub sender_id: String,
   #[serde(rename = "type")]
   pub message_type: String,
   pub is_system: bool,
   pub created_at: i64,
   pub sender: Option<SenderProfile>,
}
