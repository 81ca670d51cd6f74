//! Ordered hand-off of events that arrive on independent requests.
//!
//! Each user with pending events owns a lane: a queue drained by a single
//! task, so the dispatcher sees that user's events in push order. A lane
//! closes once it has been empty for the idle period.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use kino_core::inbound::Inbound;
use kino_core::types::UserId;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use crate::dispatcher::Dispatcher;

/// How long an empty lane waits for more events before closing.
const DEFAULT_IDLE: Duration = Duration::from_secs(60);

type LaneMap = Arc<Mutex<HashMap<UserId, UnboundedSender<Inbound>>>>;

pub struct UserLanes {
    dispatcher: Arc<Dispatcher>,
    lanes: LaneMap,
    idle: Duration,
}

impl UserLanes {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self::with_idle(dispatcher, DEFAULT_IDLE)
    }

    pub fn with_idle(dispatcher: Arc<Dispatcher>, idle: Duration) -> Self {
        Self {
            dispatcher,
            lanes: LaneMap::default(),
            idle,
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Queue `inbound` behind the user's earlier events. Returns at once;
    /// must be called from within a tokio runtime.
    pub fn push(&self, inbound: Inbound) {
        let user_id = inbound.sender.user_id;
        let mut lanes = lock(&self.lanes);

        let inbound = match lanes.get(&user_id) {
            Some(tx) => match tx.send(inbound) {
                Ok(()) => return,
                // The drain task died mid-event; open a fresh lane.
                Err(mpsc::error::SendError(inbound)) => inbound,
            },
            None => inbound,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        if tx.send(inbound).is_err() {
            return;
        }
        lanes.insert(user_id, tx);
        tracing::debug!(user_id, "Lane opened");

        tokio::spawn(drain(
            user_id,
            rx,
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.lanes),
            self.idle,
        ));
    }

    /// Number of users with an open lane.
    pub fn open(&self) -> usize {
        lock(&self.lanes).len()
    }
}

async fn drain(
    user_id: UserId,
    mut rx: UnboundedReceiver<Inbound>,
    dispatcher: Arc<Dispatcher>,
    lanes: LaneMap,
    idle: Duration,
) {
    loop {
        let inbound = match tokio::time::timeout(idle, rx.recv()).await {
            Ok(Some(inbound)) => inbound,
            Ok(None) => break,
            Err(_) => {
                // Pushes hold the map lock, so nothing slips in between the
                // emptiness check and the removal.
                let mut map = lock(&lanes);
                match rx.try_recv() {
                    Ok(inbound) => inbound,
                    Err(TryRecvError::Empty | TryRecvError::Disconnected) => {
                        map.remove(&user_id);
                        break;
                    }
                }
            }
        };
        dispatcher.handle(inbound).await;
    }
    tracing::debug!(user_id, "Lane closed");
}

fn lock(lanes: &LaneMap) -> MutexGuard<'_, HashMap<UserId, UnboundedSender<Inbound>>> {
    lanes.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{command, text, FakeCatalog, RecordingTransport};
    use kino_core::inbound::Command;
    use kino_core::texts;
    use sqlx::SqlitePool;

    fn lanes(pool: SqlitePool, idle: Duration) -> (UserLanes, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = Dispatcher::new(
            Arc::new(FakeCatalog::new(vec![])),
            transport.clone(),
            pool,
            Duration::ZERO,
        );
        (UserLanes::with_idle(Arc::new(dispatcher), idle), transport)
    }

    async fn wait_for_sends(transport: &RecordingTransport, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while transport.sent().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn events_are_handled_in_push_order(pool: SqlitePool) {
        let (lanes, transport) = lanes(pool, Duration::from_secs(5));

        lanes.push(command(7, Command::Help));
        lanes.push(text(7, "Привет"));
        lanes.push(command(7, Command::Cancel));
        wait_for_sends(&transport, 3).await;

        assert_eq!(
            transport.texts(),
            [
                texts::help(),
                texts::greeting_reply("Анна"),
                texts::NOTHING_TO_CANCEL.to_string(),
            ]
        );
        assert_eq!(lanes.open(), 1);
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn idle_lanes_close_and_reopen(pool: SqlitePool) {
        let (lanes, transport) = lanes(pool, Duration::from_millis(20));

        lanes.push(command(7, Command::Help));
        lanes.push(command(8, Command::Help));
        wait_for_sends(&transport, 2).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(lanes.open(), 0);

        lanes.push(command(7, Command::Cancel));
        wait_for_sends(&transport, 3).await;
        assert_eq!(transport.texts().last().unwrap(), texts::NOTHING_TO_CANCEL);
    }
}
