//! The dashboard itself: one selected conversation, a filtered list, a
//! composer, and a background poller, all sharing state behind a mutex.
//!
//! Every operation that awaits the store captures the state's generation
//! counter first and re-checks it before applying the response. Selecting a
//! different conversation bumps the generation, so the last selection always
//! wins regardless of which response arrives last.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::models::input::{SendMessageInput, UpdateConversationInput, ValidateExt};
use crate::models::{ConversationStatus, Message, QuickReply};
use crate::poller::{self, PollerHandle};
use crate::state::{DashboardState, NoticeLevel};
use crate::store::ConversationStore;

pub(crate) struct Inner<S: ConversationStore> {
    pub(crate) store: S,
    pub(crate) config: DashboardConfig,
    pub(crate) state: Mutex<DashboardState>,
    pub(crate) poller: Mutex<Option<PollerHandle>>,
}

pub struct Dashboard<S: ConversationStore> {
    inner: Arc<Inner<S>>,
}

impl<S: ConversationStore> Clone for Dashboard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: ConversationStore> Dashboard<S> {
    pub fn new(store: S, config: DashboardConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                config,
                state: Mutex::new(DashboardState::new(ConversationStatus::Open)),
                poller: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<Inner<S>>) -> Self {
        Self { inner }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Lock the shared state for inspection or direct edits (draft typing).
    pub fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.lock_state()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.lock_state().draft = text.into();
    }

    /// Fetch conversations for a status filter and replace the list wholesale.
    pub async fn load_conversations(
        &self,
        filter: ConversationStatus,
    ) -> Result<(), DashboardError> {
        let limit = self.inner.config.page_limit;
        match self.inner.store.list_conversations(filter, limit).await {
            Ok(conversations) => {
                let mut state = self.lock_state();
                state.filter = filter;
                state.conversations = conversations;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, filter = filter.as_str(), "conversation list load failed");
                self.lock_state()
                    .push_notice(NoticeLevel::Error, format!("Failed to load conversations: {}", e));
                Err(e)
            }
        }
    }

    /// Load a conversation's full thread and start polling it.
    ///
    /// If another selection happens while this load is in flight, the stale
    /// response is discarded when it arrives.
    pub async fn select_conversation(&self, conversation_id: &str) -> Result<(), DashboardError> {
        let generation = self.lock_state().bump_generation();
        self.stop_poller_below(generation);

        match self.inner.store.fetch_thread(conversation_id).await {
            Ok(thread) => {
                {
                    let mut state = self.lock_state();
                    if state.generation() != generation {
                        debug!(conversation = conversation_id, "discarding stale thread load");
                        return Ok(());
                    }
                    state.selected = Some(thread.conversation);
                    state.thread.replace(thread.messages);
                }
                self.start_poller(generation);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, conversation = conversation_id, "thread load failed");
                self.lock_state()
                    .push_notice(NoticeLevel::Error, format!("Failed to load conversation: {}", e));
                Err(e)
            }
        }
    }

    /// Deselect the current conversation and stop its poller.
    pub fn clear_selection(&self) {
        let generation = {
            let mut state = self.lock_state();
            let generation = state.bump_generation();
            state.selected = None;
            state.thread.clear();
            generation
        };
        self.stop_poller_below(generation);
    }

    /// Tear down background work. Call on view unmount.
    pub fn shutdown(&self) {
        self.clear_selection();
    }

    /// Send the composer draft. The draft is cleared optimistically and
    /// restored if the send fails, so typed text is never lost.
    pub async fn send_draft(&self) -> Result<Message, DashboardError> {
        let draft = {
            let mut state = self.lock_state();
            if state.selected.is_none() {
                return Err(DashboardError::NoSelection);
            }
            if state.sending {
                return Err(DashboardError::SendInFlight);
            }
            if state.draft.trim().is_empty() {
                return Err(DashboardError::EmptyMessage);
            }
            std::mem::take(&mut state.draft)
        };
        self.send_content(draft.clone(), Some(draft)).await
    }

    /// Send a quick reply's fixed content. The free-text draft is untouched,
    /// and not restored on failure.
    pub async fn send_quick_reply(&self, reply: &QuickReply) -> Result<Message, DashboardError> {
        self.send_content(reply.content.clone(), None).await
    }

    async fn send_content(
        &self,
        content: String,
        restore: Option<String>,
    ) -> Result<Message, DashboardError> {
        let trimmed = content.trim().to_string();
        if trimmed.is_empty() {
            return Err(DashboardError::EmptyMessage);
        }
        let input = SendMessageInput {
            content: trimmed.clone(),
        };
        input
            .validate_input()
            .map_err(DashboardError::Validation)?;

        let (conversation_id, generation) = {
            let mut state = self.lock_state();
            let Some(id) = state.selected_id().map(String::from) else {
                return Err(DashboardError::NoSelection);
            };
            if state.sending {
                if let Some(text) = restore {
                    if state.draft.is_empty() {
                        state.draft = text;
                    }
                }
                return Err(DashboardError::SendInFlight);
            }
            state.sending = true;
            (id, state.generation())
        };

        let result = self.inner.store.send_message(&conversation_id, &trimmed).await;

        let mut state = self.lock_state();
        state.sending = false;
        match result {
            Ok(message) => {
                // Prefer the store's canonical object over a client-side guess.
                if state.generation() == generation {
                    state.thread.merge([message.clone()]);
                }
                Ok(message)
            }
            Err(e) => {
                warn!(error = %e, conversation = %conversation_id, "message send failed");
                if let Some(text) = restore {
                    if state.draft.is_empty() {
                        state.draft = text;
                    }
                }
                state.push_notice(NoticeLevel::Error, format!("Failed to send message: {}", e));
                Err(e)
            }
        }
    }

    /// PUT a partial status/assignee update for the selected conversation,
    /// merge the confirmed fields, then reload the list so unread counts and
    /// filter membership stay correct.
    pub async fn update_conversation(
        &self,
        input: UpdateConversationInput,
    ) -> Result<(), DashboardError> {
        if input.is_empty() {
            return Err(DashboardError::Validation(
                "update must set a status or an assignee".to_string(),
            ));
        }
        input
            .validate_input()
            .map_err(DashboardError::Validation)?;

        let Some(conversation_id) = self.lock_state().selected_id().map(String::from) else {
            return Err(DashboardError::NoSelection);
        };

        match self
            .inner
            .store
            .update_conversation(&conversation_id, &input)
            .await
        {
            Ok(patch) => {
                self.lock_state().apply_patch(&patch);
                let filter = self.lock_state().filter;
                self.load_conversations(filter).await
            }
            Err(e) => {
                warn!(error = %e, conversation = %conversation_id, "conversation update failed");
                self.lock_state().push_notice(
                    NoticeLevel::Error,
                    format!("Failed to update conversation: {}", e),
                );
                Err(e)
            }
        }
    }

    /// Refresh the read-only agent and quick-reply lookups.
    pub async fn refresh_lookups(&self) -> Result<(), DashboardError> {
        let result = async {
            let agents = self.inner.store.list_agents().await?;
            let quick_replies = self.inner.store.list_quick_replies().await?;
            Ok::<_, DashboardError>((agents, quick_replies))
        }
        .await;

        match result {
            Ok((agents, quick_replies)) => {
                let mut state = self.lock_state();
                state.agents = agents;
                state.quick_replies = quick_replies;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "lookup refresh failed");
                self.lock_state()
                    .push_notice(NoticeLevel::Error, format!("Failed to load lookups: {}", e));
                Err(e)
            }
        }
    }

    /// Run a single poll tick against the current selection.
    /// Returns how many new messages were merged.
    pub async fn poll_once(&self) -> Result<usize, DashboardError> {
        let generation = self.lock_state().generation();
        self.poll_with_generation(generation).await
    }

    /// Poll for the selection identified by `generation`. A no-op if the
    /// selection has moved on, both before the request and after it returns.
    pub(crate) async fn poll_with_generation(
        &self,
        generation: u64,
    ) -> Result<usize, DashboardError> {
        let (conversation_id, cursor) = {
            let state = self.lock_state();
            if state.generation() != generation {
                return Ok(0);
            }
            let Some(id) = state.selected_id().map(String::from) else {
                return Ok(0);
            };
            (id, state.thread.cursor().map(String::from))
        };

        // An empty thread has no cursor; re-fetch the full history instead of
        // skipping the tick, so empty conversations still pick up messages.
        let messages = match cursor {
            Some(after) => {
                self.inner
                    .store
                    .messages_after(&conversation_id, &after)
                    .await?
            }
            None => self.inner.store.fetch_thread(&conversation_id).await?.messages,
        };

        let mut state = self.lock_state();
        if state.generation() != generation {
            debug!(conversation = %conversation_id, "discarding stale poll response");
            return Ok(0);
        }
        Ok(state.thread.merge(messages))
    }

    fn start_poller(&self, generation: u64) {
        let handle = poller::spawn(
            Arc::downgrade(&self.inner),
            generation,
            self.inner.config.poll_interval,
        );
        let mut guard = self.lock_poller();
        match guard.take() {
            Some(old) if old.generation() >= generation => {
                // A newer selection already owns the poller slot.
                handle.stop();
                *guard = Some(old);
            }
            Some(old) => {
                old.stop();
                *guard = Some(handle);
            }
            None => *guard = Some(handle),
        }
    }

    fn stop_poller_below(&self, generation: u64) {
        let mut guard = self.lock_poller();
        if let Some(handle) = guard.take() {
            if handle.generation() < generation {
                handle.stop();
            } else {
                *guard = Some(handle);
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DashboardState> {
        self.inner.state.lock().expect("dashboard state lock")
    }

    fn lock_poller(&self) -> MutexGuard<'_, Option<PollerHandle>> {
        self.inner.poller.lock().expect("dashboard poller lock")
    }
}
