//! Minimal HTTP/1.1 handling for the store API.
//!
//! One request per connection, `connection: close` on every response. The
//! routes and envelope shapes are shared with the client crate, so the two
//! sides cannot drift apart.

use std::collections::HashMap;
use std::sync::Arc;

use chatdesk::models::input::UpdateConversationInput;
use chatdesk::models::ConversationStatus;
use chatdesk::store::{
    AgentListEnvelope, ConversationListEnvelope, MessageEnvelope, MessageListEnvelope,
    PatchEnvelope, QuickReplyListEnvelope, SendMessageBody, ThreadEnvelope,
};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::state::{StoreState, UpdateError};

const DEFAULT_LIST_LIMIT: usize = 50;

/// Largest request body accepted; anything bigger gets a 400 before the
/// body is read.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Handle a single HTTP connection
pub async fn handle_connection(stream: TcpStream, state: Arc<StoreState>) {
    if let Err(e) = serve(stream, state).await {
        warn!("connection error: {}", e);
    }
}

async fn serve(stream: TcpStream, state: Arc<StoreState>) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await? == 0 {
        return Ok(());
    }
    let mut parts = request_line.trim_end().splitn(3, ' ');
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("").to_string();

    // Headers; only content-length matters here.
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let (status, payload) = if content_length > MAX_BODY_BYTES {
        warn!(content_length, "rejecting oversized request body");
        (400, error_body("request body too large"))
    } else {
        let mut body = vec![0u8; content_length];
        if content_length > 0 {
            reader.read_exact(&mut body).await?;
        }
        debug!(method = %method, target = %target, "request");
        route(&state, &method, &target, &body)
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        reason(status),
        payload.len(),
        payload
    );
    write_half.write_all(response.as_bytes()).await?;
    write_half.flush().await?;
    Ok(())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}

fn error_body(message: &str) -> String {
    json!({ "error": message }).to_string()
}

fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            }
        }
    }
    params
}

pub fn route(state: &StoreState, method: &str, target: &str, body: &[u8]) -> (u16, String) {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };
    let params = parse_query(query);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method, segments.as_slice()) {
        ("GET", ["conversations"]) => list_conversations(state, &params),
        ("GET", ["conversations", id]) => get_thread(state, id),
        ("GET", ["conversations", id, "messages"]) => poll_messages(state, id, &params),
        ("POST", ["conversations", id, "messages"]) => post_message(state, id, body),
        ("PUT", ["conversations", id]) => put_conversation(state, id, body),
        ("GET", ["agents"]) => {
            let envelope = AgentListEnvelope {
                agents: state.agents(),
            };
            (200, serde_json::to_string(&envelope).unwrap_or_default())
        }
        ("GET", ["quick-replies"]) => {
            let envelope = QuickReplyListEnvelope {
                quick_replies: state.quick_replies(),
            };
            (200, serde_json::to_string(&envelope).unwrap_or_default())
        }
        ("GET" | "POST" | "PUT", _) => (404, error_body("unknown route")),
        _ => (405, error_body("method not allowed")),
    }
}

fn list_conversations(state: &StoreState, params: &HashMap<String, String>) -> (u16, String) {
    let Some(status) = params
        .get("status")
        .and_then(|s| ConversationStatus::parse(s))
    else {
        return (400, error_body("missing or invalid status parameter"));
    };
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIST_LIMIT);

    let envelope = ConversationListEnvelope {
        conversations: state.list_conversations(status, limit),
    };
    (200, serde_json::to_string(&envelope).unwrap_or_default())
}

fn get_thread(state: &StoreState, conversation_id: &str) -> (u16, String) {
    match state.thread(conversation_id) {
        Some(thread) => {
            let envelope = ThreadEnvelope {
                conversation: thread,
            };
            (200, serde_json::to_string(&envelope).unwrap_or_default())
        }
        None => (404, error_body("conversation not found")),
    }
}

fn poll_messages(
    state: &StoreState,
    conversation_id: &str,
    params: &HashMap<String, String>,
) -> (u16, String) {
    let Some(after) = params.get("after") else {
        return (400, error_body("missing after parameter"));
    };
    match state.messages_after(conversation_id, after) {
        Some(messages) => {
            let envelope = MessageListEnvelope { messages };
            (200, serde_json::to_string(&envelope).unwrap_or_default())
        }
        None => (404, error_body("conversation not found")),
    }
}

fn post_message(state: &StoreState, conversation_id: &str, body: &[u8]) -> (u16, String) {
    let Ok(body) = serde_json::from_slice::<SendMessageBody>(body) else {
        return (400, error_body("invalid message body"));
    };
    if body.content.trim().is_empty() {
        return (400, error_body("message content cannot be empty"));
    }
    match state.append_staff_message(conversation_id, body.content.trim()) {
        Some(message) => {
            let envelope = MessageEnvelope { message };
            (200, serde_json::to_string(&envelope).unwrap_or_default())
        }
        None => (404, error_body("conversation not found")),
    }
}

fn put_conversation(state: &StoreState, conversation_id: &str, body: &[u8]) -> (u16, String) {
    let Ok(update) = serde_json::from_slice::<UpdateConversationInput>(body) else {
        return (400, error_body("invalid update body"));
    };
    if update.is_empty() {
        return (400, error_body("update must set a status or an assignee"));
    }
    match state.update_conversation(
        conversation_id,
        update.status,
        update.assigned_to_id.as_deref(),
    ) {
        Ok(patch) => {
            let envelope = PatchEnvelope {
                conversation: patch,
            };
            (200, serde_json::to_string(&envelope).unwrap_or_default())
        }
        Err(UpdateError::ConversationNotFound) => (404, error_body("conversation not found")),
        Err(UpdateError::AgentNotFound) => (400, error_body("unknown agent")),
    }
}
