mod agent;
mod conversation;
pub mod input;
mod message;
mod quick_reply;

pub use agent::{Agent, AssignedAgent};
pub use conversation::{Conversation, ConversationPatch, ConversationStatus, Customer};
pub use message::{Message, SenderProfile};
pub use quick_reply::QuickReply;
