//! The conversation store boundary.
//!
//! The store owns conversations, messages, agent assignment, and unread
//! counts; the dashboard only talks to it through the [`ConversationStore`]
//! trait. [`HttpStore`] is the production implementation; tests substitute
//! in-memory fakes.

mod http;

pub use http::HttpStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::models::input::UpdateConversationInput;
use crate::models::{Agent, Conversation, ConversationPatch, ConversationStatus, Message, QuickReply};

/// A conversation together with its full message history, as returned by
/// `GET /conversations/{id}`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConversationThread {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

// Wire envelopes. The server crate reuses these when serializing responses,
// so both sides agree on the shapes by construction.

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationListEnvelope {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThreadEnvelope {
    pub conversation: ConversationThread,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageListEnvelope {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub message: Message,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PatchEnvelope {
    pub conversation: ConversationPatch,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentListEnvelope {
    pub agents: Vec<Agent>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReplyListEnvelope {
    pub quick_replies: Vec<QuickReply>,
}

/// Request body for `POST /conversations/{id}/messages`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageBody {
    pub content: String,
}

#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    /// List conversations matching a status filter, newest activity first.
    async fn list_conversations(
        &self,
        status: ConversationStatus,
        limit: u32,
    ) -> Result<Vec<Conversation>, DashboardError>;

    /// Fetch one conversation with its embedded message history.
    async fn fetch_thread(&self, conversation_id: &str)
        -> Result<ConversationThread, DashboardError>;

    /// Fetch messages strictly after the given message id.
    async fn messages_after(
        &self,
        conversation_id: &str,
        after: &str,
    ) -> Result<Vec<Message>, DashboardError>;

    /// Send a message; the store echoes back the canonical message object.
    async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> Result<Message, DashboardError>;

    /// Apply a partial status/assignee update.
    async fn update_conversation(
        &self,
        conversation_id: &str,
        update: &UpdateConversationInput,
    ) -> Result<ConversationPatch, DashboardError>;

    async fn list_agents(&self) -> Result<Vec<Agent>, DashboardError>;

    async fn list_quick_replies(&self) -> Result<Vec<QuickReply>, DashboardError>;
}
