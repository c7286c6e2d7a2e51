//! The in-memory message thread for the selected conversation.
//!
//! Messages are kept in an ordered map keyed by (created_at, id), with an id
//! set for insert-or-ignore. Overlapping poll responses therefore can never
//! produce duplicates, and iteration is always oldest-first.

use std::collections::{BTreeMap, HashSet};

use crate::models::Message;

#[derive(Debug, Default)]
pub struct MessageThread {
    entries: BTreeMap<(i64, String), Message>,
    seen: HashSet<String>,
}

impl MessageThread {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire thread with a freshly fetched history.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.entries.clear();
        self.seen.clear();
        self.merge(messages);
    }

    /// Insert-or-ignore each message; returns how many were actually new.
    pub fn merge(&mut self, messages: impl IntoIterator<Item = Message>) -> usize {
        let mut added = 0;
        for message in messages {
            if self.seen.insert(message.id.clone()) {
                self.entries
                    .insert((message.created_at, message.id.clone()), message);
                added += 1;
            }
        }
        added
    }

    /// Id of the newest message, used as the `after` poll cursor.
    pub fn cursor(&self) -> Option<&str> {
        self.entries
            .last_key_value()
            .map(|(_, message)| message.id.as_str())
    }

    /// Messages in creation-time order, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }
}
