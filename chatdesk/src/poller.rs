//! The polling refresher: a cancellable background task tied to one
//! selection generation.
//!
//! The task is started when a conversation is selected and stopped when the
//! selection changes or the dashboard shuts down. It also exits on its own
//! if it observes a newer generation or the dashboard has been dropped.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::dashboard::{Dashboard, Inner};
use crate::store::ConversationStore;

pub(crate) struct PollerHandle {
    generation: u64,
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn stop(self) {
        let _ = self.shutdown.send(());
        self.task.abort();
    }
}

pub(crate) fn spawn<S: ConversationStore>(
    inner: Weak<Inner<S>>,
    generation: u64,
    interval: Duration,
) -> PollerHandle {
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the thread was just loaded,
        // so wait a full interval before the first poll.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!(generation, "poller shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(inner) = inner.upgrade() else {
                        break;
                    };
                    let dashboard = Dashboard::from_inner(inner);
                    match dashboard.poll_with_generation(generation).await {
                        Ok(0) => {}
                        Ok(added) => debug!(generation, added, "poll merged new messages"),
                        Err(e) => warn!(generation, error = %e, "poll tick failed"),
                    }
                    if dashboard.state().generation() != generation {
                        break;
                    }
                }
            }
        }
    });

    PollerHandle {
        generation,
        shutdown: shutdown_tx,
        task,
    }
}
