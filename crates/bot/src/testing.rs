//! In-memory doubles of the catalog and the chat transport.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use kino_catalog::{CatalogApi, CatalogError};
use kino_chat::{ChatError, ChatTransport};
use kino_core::inbound::{Command, Inbound, InboundKind, Sender};
use kino_core::movie::{FilterCriteria, MovieRecord, ResultPage};
use kino_core::outgoing::{Menu, Outgoing};
use kino_core::types::{ChatId, MessageId, UserId};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A catalog serving a fixed movie list.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    pub movies: Vec<MovieRecord>,
    pub types: Vec<String>,
    pub genres: Vec<String>,
    failing: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        Self {
            movies,
            types: vec!["movie".into(), "tv-series".into(), "cartoon".into()],
            genres: vec!["драма".into(), "комедия".into(), "аниме".into()],
            ..Self::default()
        }
    }

    /// Make every following call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Calls received so far, e.g. `"search_by_name(2, 3, alien)"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), CatalogError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::ApiError {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(())
    }

    fn paginate(matches: Vec<MovieRecord>, page: u32, page_size: u8) -> ResultPage {
        let size = usize::from(page_size.max(1));
        let total_count = matches.len() as u64;
        let total_pages = matches.len().div_ceil(size) as u32;
        let skip = (page.max(1) as usize - 1) * size;
        ResultPage {
            current_page: page,
            total_pages,
            total_count,
            movies: matches.into_iter().skip(skip).take(size).collect(),
        }
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn get_by_id(&self, id: i64) -> Result<MovieRecord, CatalogError> {
        self.record(format!("get_by_id({id})"))?;
        self.movies
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::ApiError {
                status: 404,
                body: format!("movie {id} not found"),
            })
    }

    async fn get_random(&self) -> Result<MovieRecord, CatalogError> {
        self.record("get_random".into())?;
        self.movies.first().cloned().ok_or_else(|| CatalogError::ApiError {
            status: 404,
            body: "empty catalog".into(),
        })
    }

    async fn search_by_name(
        &self,
        page: u32,
        page_size: u8,
        query: &str,
    ) -> Result<ResultPage, CatalogError> {
        self.record(format!("search_by_name({page}, {page_size}, {query})"))?;
        let needle = query.to_lowercase();
        let matches = self
            .movies
            .iter()
            .filter(|m| m.full_title().to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::paginate(matches, page, page_size))
    }

    async fn search_by_filters(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u8,
    ) -> Result<ResultPage, CatalogError> {
        self.record(format!(
            "search_by_filters({:?}, {:?}, {}, {}, {page}, {page_size})",
            criteria.movie_type.value,
            criteria.genre.value,
            criteria.rating.as_param(),
            criteria.years.as_param(),
        ))?;
        let matches = self
            .movies
            .iter()
            .filter(|m| {
                let rating = m.rating_kp;
                (criteria.years.min()..=criteria.years.max()).contains(&m.year)
                    && rating >= f64::from(criteria.rating.min())
                    && rating <= f64::from(criteria.rating.max())
                    && criteria
                        .genre
                        .value
                        .as_ref()
                        .map_or(true, |genre| m.genres.contains(genre))
            })
            .cloned()
            .collect();
        Ok(Self::paginate(matches, page, page_size))
    }

    async fn list_types(&self) -> Result<Vec<String>, CatalogError> {
        self.record("list_types".into())?;
        Ok(self.types.clone())
    }

    async fn list_genres(&self) -> Result<Vec<String>, CatalogError> {
        self.record("list_genres".into())?;
        Ok(self.genres.clone())
    }
}

/// A catalog movie with predictable fields.
pub fn movie(id: i64, title: &str, year: i32, rating: f64, genres: &[&str]) -> MovieRecord {
    MovieRecord {
        id,
        original_title: title.to_string(),
        alternative_title: None,
        year,
        rating_kp: rating,
        rating_imdb: rating,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        description: Some(format!("About {title}")),
        poster_url: Some(format!("https://posters.test/{id}.jpg")),
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// One call made on the [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCall {
    Send {
        chat_id: ChatId,
        message_id: MessageId,
        message: Outgoing,
    },
    Edit {
        message_id: MessageId,
        text: String,
        menu: Option<Menu>,
    },
    Delete {
        message_id: MessageId,
    },
    Answer {
        callback_id: String,
        notice: Option<String>,
    },
    SetCommands(Vec<Command>),
}

/// A transport that remembers every call and hands out increasing
/// message ids.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<ChatCall>>,
    next_id: AtomicI64,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget the calls so far.
    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Messages sent, in order.
    pub fn sent(&self) -> Vec<Outgoing> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChatCall::Send { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Texts of the text messages sent, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|message| match message {
                Outgoing::Text { text, .. } => Some(text),
                Outgoing::Photo { .. } => None,
            })
            .collect()
    }

    /// Captions of the photos sent, in order.
    pub fn captions(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|message| match message {
                Outgoing::Photo { caption, .. } => Some(caption),
                Outgoing::Text { .. } => None,
            })
            .collect()
    }

    /// Id and message of the most recent send.
    pub fn last_sent(&self) -> Option<(MessageId, Outgoing)> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ChatCall::Send {
                message_id,
                message,
                ..
            } => Some((message_id, message)),
            _ => None,
        })
    }

    fn push(&self, call: ChatCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, chat_id: ChatId, message: &Outgoing) -> Result<MessageId, ChatError> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.push(ChatCall::Send {
            chat_id,
            message_id,
            message: message.clone(),
        });
        Ok(message_id)
    }

    async fn edit_text(
        &self,
        _chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<(), ChatError> {
        self.push(ChatCall::Edit {
            message_id,
            text: text.to_string(),
            menu: menu.cloned(),
        });
        Ok(())
    }

    async fn delete(&self, _chat_id: ChatId, message_id: MessageId) -> Result<(), ChatError> {
        self.push(ChatCall::Delete { message_id });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        notice: Option<&str>,
    ) -> Result<(), ChatError> {
        self.push(ChatCall::Answer {
            callback_id: callback_id.to_string(),
            notice: notice.map(str::to_string),
        });
        Ok(())
    }

    async fn set_commands(&self, commands: &[Command]) -> Result<(), ChatError> {
        self.push(ChatCall::SetCommands(commands.to_vec()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

fn inbound(user_id: UserId, kind: InboundKind) -> Inbound {
    Inbound {
        sender: Sender {
            user_id,
            first_name: "Анна".into(),
            full_name: "Анна Каренина".into(),
        },
        chat_id: user_id,
        kind,
    }
}

pub fn command(user_id: UserId, command: Command) -> Inbound {
    inbound(user_id, InboundKind::Command(command))
}

pub fn text(user_id: UserId, text: &str) -> Inbound {
    inbound(user_id, InboundKind::Text(text.to_string()))
}

/// A button press on message `origin` carrying `data`.
pub fn press(user_id: UserId, origin: MessageId, data: &str) -> Inbound {
    inbound(
        user_id,
        InboundKind::Callback {
            callback_id: format!("cb-{origin}-{data}"),
            origin: Some(origin),
            data: data.to_string(),
        },
    )
}
