//! Shared dashboard state: the conversation list, the selected thread, the
//! composer draft, and the notice queue.
//!
//! All mutation happens under the dashboard's mutex; async operations capture
//! the generation counter before awaiting and re-check it afterwards, so a
//! response for a superseded selection is discarded instead of applied.

use std::collections::VecDeque;

use crate::models::{Agent, Conversation, ConversationPatch, ConversationStatus, QuickReply};
use crate::thread::MessageThread;

/// Maximum queued notices; oldest are dropped past this.
const MAX_NOTICES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A toast-style notification surfaced to the operator.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub at: i64,
}

#[derive(Debug)]
pub struct DashboardState {
    pub filter: ConversationStatus,
    pub conversations: Vec<Conversation>,
    pub selected: Option<Conversation>,
    pub thread: MessageThread,
    pub draft: String,
    pub sending: bool,
    pub agents: Vec<Agent>,
    pub quick_replies: Vec<QuickReply>,
    generation: u64,
    notices: VecDeque<Notice>,
}

impl DashboardState {
    pub fn new(filter: ConversationStatus) -> Self {
        Self {
            filter,
            conversations: Vec::new(),
            selected: None,
            thread: MessageThread::new(),
            draft: String::new(),
            sending: false,
            agents: Vec::new(),
            quick_replies: Vec::new(),
            generation: 0,
            notices: VecDeque::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate every in-flight response tied to the previous selection.
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|c| c.id.as_str())
    }

    /// Merge the fields the store confirmed into the selected conversation
    /// and its row in the list.
    pub fn apply_patch(&mut self, patch: &ConversationPatch) {
        if let Some(selected) = self.selected.as_mut() {
            if selected.id == patch.id {
                if let Some(status) = patch.status {
                    selected.status = status;
                }
                if let Some(agent) = &patch.assigned_to {
                    selected.assigned_to = Some(agent.clone());
                }
            }
        }
        if let Some(row) = self.conversations.iter_mut().find(|c| c.id == patch.id) {
            if let Some(status) = patch.status {
                row.status = status;
            }
            if let Some(agent) = &patch.assigned_to {
                row.assigned_to = Some(agent.clone());
            }
        }
    }

    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        // Enforce queue limit - drop oldest if at capacity
        if self.notices.len() >= MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            level,
            text: text.into(),
            at: chrono::Utc::now().timestamp_millis(),
        });
    }

    /// Drain all queued notices (the UI renders and forgets them).
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn notice_count(&self) -> usize {
        self.notices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignedAgent, Customer};

    fn conversation(id: &str, status: ConversationStatus) -> Conversation {
        Conversation {
            id: id.to_string(),
            subject: None,
            status,
            priority: 0,
            unread_count: 0,
            last_message_at: None,
            customer: Customer {
                id: "customer-1".to_string(),
                name: "Ada".to_string(),
                email: None,
                avatar_url: None,
            },
            assigned_to: None,
        }
    }

    #[test]
    fn bump_generation_is_monotonic() {
        let mut state = DashboardState::new(ConversationStatus::Open);
        let first = state.bump_generation();
        let second = state.bump_generation();
        assert!(second > first);
    }

    #[test]
    fn apply_patch_updates_selected_and_list_row() {
        let mut state = DashboardState::new(ConversationStatus::Open);
        state.conversations = vec![
            conversation("c1", ConversationStatus::Open),
            conversation("c2", ConversationStatus::Open),
        ];
        state.selected = Some(conversation("c1", ConversationStatus::Open));

        state.apply_patch(&ConversationPatch {
            id: "c1".to_string(),
            status: Some(ConversationStatus::Resolved),
            assigned_to: Some(AssignedAgent {
                id: "agent-1".to_string(),
                name: "Sam".to_string(),
            }),
        });

        let selected = state.selected.as_ref().unwrap();
        assert_eq!(selected.status, ConversationStatus::Resolved);
        assert_eq!(selected.assigned_to.as_ref().unwrap().id, "agent-1");
        assert_eq!(state.conversations[0].status, ConversationStatus::Resolved);
        // The other row is untouched.
        assert_eq!(state.conversations[1].status, ConversationStatus::Open);
    }

    #[test]
    fn apply_patch_ignores_other_selection() {
        let mut state = DashboardState::new(ConversationStatus::Open);
        state.selected = Some(conversation("c2", ConversationStatus::Open));

        state.apply_patch(&ConversationPatch {
            id: "c1".to_string(),
            status: Some(ConversationStatus::Closed),
            assigned_to: None,
        });

        assert_eq!(
            state.selected.as_ref().unwrap().status,
            ConversationStatus::Open
        );
    }

    #[test]
    fn notice_queue_drops_oldest_at_capacity() {
        let mut state = DashboardState::new(ConversationStatus::Open);
        for i in 0..MAX_NOTICES + 5 {
            state.push_notice(NoticeLevel::Info, format!("notice {}", i));
        }
        assert_eq!(state.notice_count(), MAX_NOTICES);

        let notices = state.take_notices();
        assert_eq!(notices[0].text, "notice 5");
        assert_eq!(state.notice_count(), 0);
    }
}
