//! Inbound event handling.
//!
//! [`Dispatcher::handle`] takes one user event through the wizard state
//! machine and carries out the resulting effects against the catalog, the
//! search log and the chat. Events of one user are handled strictly one at a
//! time (see [`UserGate`]).

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use kino_catalog::CatalogApi;
use kino_chat::ChatTransport;
use kino_core::choice::Choice;
use kino_core::history::MovieRef;
use kino_core::inbound::{Command, Inbound, InboundKind};
use kino_core::menu;
use kino_core::outgoing::{Menu, Outgoing};
use kino_core::render::movie_message;
use kino_core::session::{SessionStore, Wizard};
use kino_core::texts;
use kino_core::types::{MessageId, UserId};
use kino_core::wizard::{self, Effect, Input, Transition};
use kino_db::history::load_history;
use kino_db::models::search_request::CreateSearchRequest;
use kino_db::repositories::{ResultMovieRepo, SearchRequestRepo};
use kino_db::DbPool;
use tracing::Instrument;

use crate::error::BotError;
use crate::gate::UserGate;

pub struct Dispatcher {
    catalog: Arc<dyn CatalogApi>,
    transport: Arc<dyn ChatTransport>,
    pool: DbPool,
    sessions: SessionStore,
    gate: UserGate,
    /// Pause between two rendered movies.
    pacing: Duration,
}

/// Where the event came from, as the effects need it.
struct Origin<'a> {
    inbound: &'a Inbound,
    /// The message whose button was pressed, if any.
    message_id: Option<MessageId>,
}

impl Dispatcher {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        transport: Arc<dyn ChatTransport>,
        pool: DbPool,
        pacing: Duration,
    ) -> Self {
        Self {
            catalog,
            transport,
            pool,
            sessions: SessionStore::new(),
            gate: UserGate::new(),
            pacing,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Publish the command list in the chat client's menu.
    pub async fn register_commands(&self) -> Result<(), BotError> {
        self.transport.set_commands(&Command::ALL).await?;
        Ok(())
    }

    /// Handle one event to completion. Failures are logged and reported to
    /// the user; none of them escapes.
    pub async fn handle(&self, inbound: Inbound) {
        let user_id = inbound.sender.user_id;
        let _turn = self.gate.enter(user_id).await;

        let span = tracing::info_span!("inbound", user_id, chat_id = inbound.chat_id);
        async {
            if let Err(err) = self.dispatch(&inbound).await {
                self.report(&inbound, err).await;
            }
        }
        .instrument(span)
        .await
    }

    // ---- event kinds ----

    async fn dispatch(&self, inbound: &Inbound) -> Result<(), BotError> {
        match &inbound.kind {
            InboundKind::Command(command) => self.on_command(inbound, *command).await,
            InboundKind::Text(text) => self.on_text(inbound, text).await,
            InboundKind::Callback {
                callback_id,
                origin,
                data,
            } => self.on_callback(inbound, callback_id, *origin, data).await,
        }
    }

    async fn on_command(&self, inbound: &Inbound, command: Command) -> Result<(), BotError> {
        let user_id = inbound.sender.user_id;
        tracing::info!(command = command.name(), "Command received");

        match command {
            Command::Start => {
                self.sessions.clear(user_id).await;
                self.say(inbound, Outgoing::text(texts::greeting(&inbound.sender.full_name)))
                    .await;
                Ok(())
            }
            Command::Help => {
                self.say(inbound, Outgoing::text(texts::help())).await;
                Ok(())
            }
            Command::Cancel => {
                let reply = match self.sessions.clear(user_id).await {
                    Some(_) => texts::CANCELLED,
                    None => texts::NOTHING_TO_CANCEL,
                };
                self.say(inbound, Outgoing::text(reply)).await;
                Ok(())
            }
            Command::Random => self.show_random(inbound).await,
            Command::ByName => self.begin(inbound, Wizard::ByName).await,
            Command::ByFilters => self.begin(inbound, Wizard::ByFilters).await,
            Command::History => self.begin(inbound, Wizard::History).await,
        }
    }

    async fn on_text(&self, inbound: &Inbound, text: &str) -> Result<(), BotError> {
        match self.sessions.get(inbound.sender.user_id).await {
            Some(session) => {
                let transition = wizard::advance(session, Input::Text(text.to_string()));
                self.apply(Origin { inbound, message_id: None }, transition).await
            }
            None => {
                let reply = if text.contains(texts::GREETING_TRIGGER) {
                    texts::greeting_reply(&inbound.sender.first_name)
                } else {
                    texts::UNKNOWN_INPUT.to_string()
                };
                self.say(inbound, Outgoing::text(reply)).await;
                Ok(())
            }
        }
    }

    async fn on_callback(
        &self,
        inbound: &Inbound,
        callback_id: &str,
        origin: Option<MessageId>,
        data: &str,
    ) -> Result<(), BotError> {
        let Some(choice) = Choice::decode(data) else {
            tracing::debug!(data, "Undecodable callback");
            self.acknowledge(callback_id, Some(texts::OUTDATED_BUTTON)).await;
            return Ok(());
        };

        // History buttons stay usable after the history run is over.
        if let Choice::HistoryMovie(id) = choice {
            self.acknowledge(callback_id, None).await;
            let movie = self.catalog.get_by_id(id).await?;
            self.say(inbound, movie_message(&movie)).await;
            return Ok(());
        }

        let Some(session) = self.sessions.get(inbound.sender.user_id).await else {
            self.acknowledge(callback_id, Some(texts::OUTDATED_BUTTON)).await;
            return Ok(());
        };

        let transition = wizard::advance(session, Input::Choice(choice));
        let notice = transition.effects.iter().find_map(|effect| match effect {
            Effect::Notice(text) => Some(*text),
            _ => None,
        });
        self.acknowledge(callback_id, notice).await;
        self.apply(
            Origin {
                inbound,
                message_id: origin,
            },
            transition,
        )
        .await
    }

    async fn begin(&self, inbound: &Inbound, wizard: Wizard) -> Result<(), BotError> {
        let transition = wizard::start(wizard, &inbound.sender.first_name);
        self.apply(Origin { inbound, message_id: None }, transition).await
    }

    /// `/random`: one movie, logged as a one-movie search. Leaves any wizard
    /// run untouched.
    async fn show_random(&self, inbound: &Inbound) -> Result<(), BotError> {
        let movie = self.catalog.get_random().await?;

        let request = SearchRequestRepo::create(
            &self.pool,
            inbound.sender.user_id,
            &CreateSearchRequest::random(),
        )
        .await?;
        ResultMovieRepo::create_many(
            &self.pool,
            request.id,
            &[MovieRef {
                catalog_id: movie.id,
                title: movie.full_title(),
            }],
        )
        .await?;

        tracing::info!(request_id = request.id, movie_id = movie.id, "Random movie");
        self.say(inbound, movie_message(&movie)).await;
        Ok(())
    }

    // ---- effects ----

    /// Store the transition's session and run its effects in order. Effects
    /// reporting back to the state machine queue their follow-ups in front
    /// of whatever is left.
    async fn apply(&self, origin: Origin<'_>, transition: Transition) -> Result<(), BotError> {
        let user_id = origin.inbound.sender.user_id;
        let mut session = transition.session;
        self.sessions.replace(user_id, session.clone()).await;

        let mut queue: VecDeque<Effect> = transition.effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Reply(message) => {
                    self.say(origin.inbound, message).await;
                }
                Effect::EditOrigin { text, menu } => {
                    self.edit_origin(&origin, &text, menu).await;
                }
                Effect::DeleteOrigin => {
                    if let Some(message_id) = origin.message_id {
                        let deleted = self.transport.delete(origin.inbound.chat_id, message_id).await;
                        if let Err(e) = deleted {
                            tracing::warn!(message_id, error = %e, "Failed to delete menu message");
                        }
                    }
                }
                // Delivered with the callback acknowledgement.
                Effect::Notice(_) => {}
                Effect::PromptTypes { text } => {
                    let types = match self.catalog.list_types().await {
                        Ok(types) => types,
                        Err(e) => {
                            self.sessions.clear(user_id).await;
                            return Err(e.into());
                        }
                    };
                    let message = Outgoing::text(text).with_menu(menu::types_menu(&types));
                    self.say(origin.inbound, message).await;
                }
                Effect::PromptGenres { text } => {
                    let genres = match self.catalog.list_genres().await {
                        Ok(genres) => genres,
                        Err(e) => {
                            self.sessions.clear(user_id).await;
                            return Err(e.into());
                        }
                    };
                    let message = Outgoing::text(text).with_menu(menu::genres_menu(&genres));
                    self.say(origin.inbound, message).await;
                }
                Effect::SaveRequest => {
                    let Some(current) = session.take() else {
                        continue;
                    };
                    let Some(paging) = current.paging() else {
                        session = Some(current);
                        continue;
                    };
                    let input = CreateSearchRequest::from_query(&paging.query);
                    let saved = self
                        .logged(user_id, SearchRequestRepo::create(&self.pool, user_id, &input))
                        .await?;
                    tracing::info!(
                        request_id = saved.id,
                        command = input.command.as_str(),
                        "Search logged"
                    );

                    let next = wizard::request_saved(current, saved.id);
                    session = Some(next);
                    self.sessions.replace(user_id, session.clone()).await;
                }
                Effect::FetchPage => {
                    let Some(current) = session.take() else {
                        continue;
                    };
                    let Some(request) = wizard::next_page(&current) else {
                        session = Some(current);
                        continue;
                    };

                    let followup = match self.catalog.fetch_page(&request.query, request.page).await {
                        Ok(page) => {
                            tracing::info!(
                                page = request.page,
                                total_pages = page.total_pages,
                                found = page.movies.len(),
                                "Catalog page fetched"
                            );
                            wizard::page_loaded(current, &request, page)
                        }
                        Err(e) => {
                            tracing::warn!(page = request.page, error = %e, "Catalog page failed");
                            wizard::page_failed(current)
                        }
                    };

                    session = followup.session;
                    self.sessions.replace(user_id, session.clone()).await;
                    for effect in followup.effects.into_iter().rev() {
                        queue.push_front(effect);
                    }
                }
                Effect::RecordResults { request_id, movies } => {
                    let written = self
                        .logged(user_id, ResultMovieRepo::create_many(&self.pool, request_id, &movies))
                        .await?;
                    tracing::debug!(request_id, written, "Results logged");
                }
                Effect::ShowMovies(movies) => {
                    for (i, movie) in movies.iter().enumerate() {
                        if i > 0 {
                            self.pause().await;
                        }
                        self.say(origin.inbound, movie_message(movie)).await;
                    }
                }
                Effect::ShowHistory { limit } => {
                    let entries = self
                        .logged(user_id, load_history(&self.pool, user_id, limit))
                        .await?;
                    if entries.is_empty() {
                        self.say(origin.inbound, Outgoing::text(texts::HISTORY_EMPTY)).await;
                        continue;
                    }
                    for (i, entry) in entries.iter().enumerate() {
                        if i > 0 {
                            self.pause().await;
                        }
                        let mut message = Outgoing::html(entry.to_html());
                        let movies = menu::history_movies_menu(
                            entry.movies.iter().map(|m| (m.catalog_id, m.title.as_str())),
                        );
                        if !movies.is_empty() {
                            message = message.with_menu(movies);
                        }
                        self.say(origin.inbound, message).await;
                    }
                }
            }
        }
        Ok(())
    }

    // ---- private helpers ----

    /// Run a search log operation; a failure ends the user's run.
    async fn logged<T>(
        &self,
        user_id: UserId,
        operation: impl std::future::Future<Output = Result<T, sqlx::Error>>,
    ) -> Result<T, BotError> {
        match operation.await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.sessions.clear(user_id).await;
                Err(e.into())
            }
        }
    }

    async fn report(&self, inbound: &Inbound, err: BotError) {
        match err {
            BotError::Catalog(e) => {
                tracing::warn!(error = %e, "Catalog request failed");
                self.say(inbound, Outgoing::text(texts::TRY_AGAIN)).await;
            }
            BotError::Database(e) => {
                tracing::error!(error = %e, "Search log failed");
                self.say(inbound, Outgoing::text(texts::INTERNAL_FAILURE)).await;
            }
            BotError::Chat(e) => {
                tracing::warn!(error = %e, "Chat call failed");
            }
        }
    }

    /// Send a message to the event's chat. Transport failures are logged.
    async fn say(&self, inbound: &Inbound, message: Outgoing) -> Option<MessageId> {
        match self.transport.send(inbound.chat_id, &message).await {
            Ok(message_id) => Some(message_id),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send message");
                None
            }
        }
    }

    /// Rewrite the pressed message, or send the text anew when the event was
    /// typed or the edit is refused.
    async fn edit_origin(&self, origin: &Origin<'_>, text: &str, menu: Option<Menu>) {
        if let Some(message_id) = origin.message_id {
            match self
                .transport
                .edit_text(origin.inbound.chat_id, message_id, text, menu.as_ref())
                .await
            {
                Ok(()) => return,
                Err(e) => tracing::warn!(message_id, error = %e, "Failed to edit menu message"),
            }
        }
        let mut message = Outgoing::text(text);
        if let Some(menu) = menu {
            message = message.with_menu(menu);
        }
        self.say(origin.inbound, message).await;
    }

    async fn acknowledge(&self, callback_id: &str, notice: Option<&str>) {
        if let Err(e) = self.transport.answer_callback(callback_id, notice).await {
            tracing::warn!(error = %e, "Failed to answer callback");
        }
    }

    async fn pause(&self) {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pacing", &self.pacing)
            .finish_non_exhaustive()
    }
}
