//! Shared builders for integration tests.

use chatdesk::models::{Conversation, ConversationStatus, Customer, Message, QuickReply};
use chatdesk::store::ConversationThread;

pub fn conversation(id: &str, status: ConversationStatus) -> Conversation {
    Conversation {
        id: id.to_string(),
        subject: Some(format!("Subject for {}", id)),
        status,
        priority: 1,
        unread_count: 0,
        last_message_at: None,
        customer: Customer {
            id: format!("customer-{}", id),
            name: "Ada Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            avatar_url: None,
        },
        assigned_to: None,
    }
}

pub fn message(id: &str, created_at: i64) -> Message {
    Message {
        id: id.to_string(),
        content: format!("message {}", id),
        sender_id: "customer-1".to_string(),
        message_type: "text".to_string(),
        is_system: false,
        created_at,
        sender: None,
    }
}

pub fn thread(conversation: Conversation, messages: Vec<Message>) -> ConversationThread {
    ConversationThread {
        conversation,
        messages,
    }
}

pub fn quick_reply(content: &str) -> QuickReply {
    QuickReply {
        id: "qr-1".to_string(),
        title: "Greeting".to_string(),
        content: content.to_string(),
        category: Some("general".to_string()),
    }
}
