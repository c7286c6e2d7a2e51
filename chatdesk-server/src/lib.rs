//! Chatdesk conversation store, in-memory reference implementation.
//!
//! This module exposes the server components for use in integration tests.

mod http;
mod state;

pub use http::{handle_connection, route};
pub use state::{ConversationRecord, StoreState, UpdateError};
