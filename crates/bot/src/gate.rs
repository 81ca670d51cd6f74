//! Per-user serialization of inbound events.
//!
//! Events from one user are handled one at a time, in arrival order; events
//! from different users never wait on each other.

use std::collections::HashMap;
use std::sync::Arc;

use kino_core::types::UserId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Idle locks are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Default)]
pub struct UserGate {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the user's turn. The turn lasts as long as the guard lives.
    pub async fn enter(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                // Only the map holds an idle lock.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            Arc::clone(locks.entry(user_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of users with a tracked lock.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_user_waits_for_the_previous_turn() {
        let gate = Arc::new(UserGate::new());
        let first = gate.enter(1).await;

        let waiting = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                let _turn = gate.enter(1).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(first);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_users_do_not_block() {
        let gate = UserGate::new();
        let _first = gate.enter(1).await;
        tokio::time::timeout(Duration::from_millis(100), gate.enter(2))
            .await
            .unwrap();
        assert_eq!(gate.tracked().await, 2);
    }
}
