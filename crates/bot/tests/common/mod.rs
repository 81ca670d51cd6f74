use std::sync::Arc;
use std::time::Duration;

use kino_bot::testing::{movie, ChatCall, FakeCatalog, RecordingTransport};
use kino_bot::Dispatcher;
use kino_core::types::MessageId;
use sqlx::SqlitePool;

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub catalog: Arc<FakeCatalog>,
    pub transport: Arc<RecordingTransport>,
    pub pool: SqlitePool,
}

/// A small catalog: three "Alien" movies and two dramas.
pub fn catalog() -> FakeCatalog {
    FakeCatalog::new(vec![
        movie(1, "Alien", 1979, 8.1, &["ужасы", "фантастика"]),
        movie(2, "Aliens", 1986, 7.9, &["фантастика", "боевик"]),
        movie(3, "Alien 3", 1992, 6.6, &["ужасы"]),
        movie(4, "Amelie", 2001, 7.9, &["драма", "комедия"]),
        movie(5, "Amour", 2012, 7.2, &["драма"]),
    ])
}

pub fn harness(pool: SqlitePool) -> Harness {
    harness_with(pool, catalog())
}

pub fn harness_with(pool: SqlitePool, catalog: FakeCatalog) -> Harness {
    let catalog = Arc::new(catalog);
    let transport = Arc::new(RecordingTransport::new());
    let dispatcher = Dispatcher::new(
        catalog.clone(),
        transport.clone(),
        pool.clone(),
        Duration::ZERO,
    );
    Harness {
        dispatcher,
        catalog,
        transport,
        pool,
    }
}

/// Id of the most recent message sent with a menu.
pub fn last_menu_id(transport: &RecordingTransport) -> MessageId {
    transport
        .calls()
        .into_iter()
        .rev()
        .find_map(|call| match call {
            ChatCall::Send {
                message_id,
                message,
                ..
            } if message.menu().is_some() => Some(message_id),
            _ => None,
        })
        .expect("a menu was sent")
}

/// Callback data of every button of the most recent menu.
pub fn last_menu_data(transport: &RecordingTransport) -> Vec<String> {
    let (_, message) = transport
        .calls()
        .into_iter()
        .rev()
        .find_map(|call| match call {
            ChatCall::Send {
                message_id,
                message,
                ..
            } if message.menu().is_some() => Some((message_id, message)),
            _ => None,
        })
        .expect("a menu was sent");
    message
        .menu()
        .map(|menu| menu.buttons().map(|b| b.choice.encode()).collect())
        .unwrap_or_default()
}
