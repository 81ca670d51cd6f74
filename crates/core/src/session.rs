//! Per-user wizard sessions.
//!
//! A user has at most one session. Starting a wizard replaces whatever was
//! there before without telling the user; sessions live in process memory
//! and never expire.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::movie::{RatingRange, SearchQuery, Selection, YearRange};
use crate::types::{DbId, UserId};

/// The multi-step flows a session can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wizard {
    ByFilters,
    ByName,
    History,
}

impl Wizard {
    /// The stage a fresh run of this wizard starts in.
    pub fn first_stage(self) -> Stage {
        match self {
            Self::ByFilters => Stage::FilterType,
            Self::ByName => Stage::NameQuery,
            Self::History => Stage::HistoryLimit,
        }
    }
}

/// Cursor of a search being paged through.
///
/// `page` is the last page successfully shown; `0` before the first fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Paging {
    pub query: SearchQuery,
    pub page: u32,
    pub request_id: Option<DbId>,
}

/// Where a wizard currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    FilterType,
    FilterGenre,
    FilterRating,
    FilterYear,
    FilterAmount,
    NameQuery,
    NameAmount,
    HistoryLimit,
    Paging(Paging),
}

/// Answers collected so far. Each field is written once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub movie_type: Option<Selection>,
    pub genre: Option<Selection>,
    /// First half of a two-step rating answer.
    pub rating_min: Option<u8>,
    pub rating: Option<RatingRange>,
    pub years: Option<YearRange>,
    pub query: Option<String>,
}

/// One user's wizard run.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub wizard: Wizard,
    pub stage: Stage,
    pub draft: Draft,
    /// Used to address the user in prompts.
    pub first_name: String,
}

impl Session {
    pub fn new(wizard: Wizard, first_name: impl Into<String>) -> Self {
        Self {
            wizard,
            stage: wizard.first_stage(),
            draft: Draft::default(),
            first_name: first_name.into(),
        }
    }

    pub fn paging(&self) -> Option<&Paging> {
        match &self.stage {
            Stage::Paging(paging) => Some(paging),
            _ => None,
        }
    }
}

/// Sessions of all users.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh run of `wizard`, discarding any session the user had.
    pub async fn start(&self, user_id: UserId, wizard: Wizard, first_name: &str) -> Session {
        let session = Session::new(wizard, first_name);
        self.sessions.write().await.insert(user_id, session.clone());
        session
    }

    pub async fn get(&self, user_id: UserId) -> Option<Session> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    /// Mutate the user's session in place. Returns `None` if there is none.
    pub async fn update<F, R>(&self, user_id: UserId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        self.sessions.write().await.get_mut(&user_id).map(f)
    }

    /// Store `session`, or clear the user's session when `None`.
    pub async fn replace(&self, user_id: UserId, session: Option<Session>) {
        let mut sessions = self.sessions.write().await;
        match session {
            Some(session) => {
                sessions.insert(user_id, session);
            }
            None => {
                sessions.remove(&user_id);
            }
        }
    }

    pub async fn clear(&self, user_id: UserId) -> Option<Session> {
        self.sessions.write().await.remove(&user_id)
    }

    /// Number of users with an active session.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_replaces_previous_session() {
        let store = SessionStore::new();
        store.start(1, Wizard::ByName, "Анна").await;
        store
            .update(1, |s| s.draft.query = Some("Matrix".to_string()))
            .await;

        let fresh = store.start(1, Wizard::ByFilters, "Анна").await;
        assert_eq!(fresh.stage, Stage::FilterType);

        let stored = store.get(1).await.unwrap();
        assert_eq!(stored.wizard, Wizard::ByFilters);
        assert_eq!(stored.draft, Draft::default());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = SessionStore::new();
        store.start(1, Wizard::ByName, "a").await;
        store.start(2, Wizard::History, "b").await;

        store.clear(1).await;
        assert!(store.get(1).await.is_none());
        assert_eq!(store.get(2).await.unwrap().wizard, Wizard::History);
    }

    #[tokio::test]
    async fn update_without_session_is_none() {
        let store = SessionStore::new();
        assert!(store.update(7, |s| s.stage = Stage::NameAmount).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn replace_with_none_clears() {
        let store = SessionStore::new();
        store.start(3, Wizard::ByName, "c").await;
        store.replace(3, None).await;
        assert!(store.is_empty().await);

        store.replace(3, Some(Session::new(Wizard::History, "c"))).await;
        assert_eq!(store.get(3).await.unwrap().stage, Stage::HistoryLimit);
    }
}
