//! Long-polling update loop.
//!
//! Polls for updates after the last seen `update_id`, hands each batch to
//! the dispatcher and repeats until the [`CancellationToken`] is triggered.
//! Within a batch every user's events are handled in order on their own
//! task; the next poll starts once the batch is done.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kino_bot::Dispatcher;
use kino_chat::mapping::to_inbound;
use kino_chat::types::Update;
use kino_chat::{ChatError, TelegramApi};
use kino_core::inbound::Inbound;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Delay after the first failed poll.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Upper bound on the delay between failed polls.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Where updates come from.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Updates with `update_id >= offset`, waiting up to `timeout_secs`
    /// for the first one.
    async fn poll(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ChatError>;
}

#[async_trait]
impl UpdateSource for TelegramApi {
    async fn poll(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ChatError> {
        self.get_updates(offset, timeout_secs).await
    }
}

pub struct Poller<S> {
    source: S,
    dispatcher: Arc<Dispatcher>,
    timeout_secs: u64,
}

impl<S: UpdateSource> Poller<S> {
    pub fn new(source: S, dispatcher: Arc<Dispatcher>, timeout_secs: u64) -> Self {
        Self {
            source,
            dispatcher,
            timeout_secs,
        }
    }

    /// Run the polling loop until `cancel` is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(timeout_secs = self.timeout_secs, "Polling started");

        let mut offset = 0;
        let mut delay = INITIAL_BACKOFF;

        loop {
            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Polling stopping");
                    break;
                }
                polled = self.source.poll(offset, self.timeout_secs) => polled,
            };

            match polled {
                Ok(updates) => {
                    delay = INITIAL_BACKOFF;
                    if updates.is_empty() {
                        continue;
                    }
                    offset = next_offset(offset, &updates);
                    tracing::debug!(count = updates.len(), offset, "Updates received");
                    self.dispatch_batch(updates).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, delay_ms = delay.as_millis() as u64, "Polling failed");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                    delay = next_delay(delay);
                }
            }
        }
    }

    async fn dispatch_batch(&self, updates: Vec<Update>) {
        let mut tasks = JoinSet::new();
        for events in by_user(updates.into_iter().filter_map(to_inbound)) {
            let dispatcher = Arc::clone(&self.dispatcher);
            tasks.spawn(async move {
                for inbound in events {
                    dispatcher.handle(inbound).await;
                }
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Update handler panicked");
            }
        }
    }
}

/// Offset acknowledging every update in `updates`.
pub fn next_offset(current: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .map_or(current, |next| next.max(current))
}

/// Double the delay, clamped to [`MAX_BACKOFF`].
pub fn next_delay(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

/// Group events per user, keeping arrival order within each group.
fn by_user(events: impl Iterator<Item = Inbound>) -> Vec<Vec<Inbound>> {
    let mut groups: Vec<Vec<Inbound>> = Vec::new();
    for event in events {
        let user_id = event.sender.user_id;
        match groups
            .iter_mut()
            .find(|group| group[0].sender.user_id == user_id)
        {
            Some(group) => group.push(event),
            None => groups.push(vec![event]),
        }
    }
    groups
}
