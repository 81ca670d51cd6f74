//! Wizard state machine.
//!
//! Transitions are pure: each takes the current [`Session`] plus one user
//! input and returns the next session (or `None` to end the run) along with
//! the [`Effect`]s the caller must carry out, in order. Everything that
//! touches the catalog, the search log or the chat is an effect.

use crate::choice::{Choice, PageAction, RatingPick};
use crate::history::MovieRef;
use crate::menu;
use crate::movie::{
    is_rating, FilterCriteria, MovieRecord, NameQuery, RatingRange, ResultPage, SearchQuery,
    Selection, MAX_RATING, MIN_RATING,
};
use crate::outgoing::{Menu, Outgoing};
use crate::session::{Paging, Session, Stage, Wizard};
use crate::texts;
use crate::types::DbId;
use crate::validation::{
    parse_year_range, validate_amount, FILTER_PAGE_SIZES, HISTORY_LIMITS, NAME_PAGE_SIZES,
};

/// Typed words accepted in place of the pagination buttons.
const NEXT_WORD: &str = "далее";
const STOP_WORD: &str = "хватит";

/// One user answer to a wizard prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Choice(Choice),
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a new message.
    Reply(Outgoing),
    /// Replace the text (and menu) of the message whose button was pressed.
    EditOrigin { text: String, menu: Option<Menu> },
    /// Remove the message whose button was pressed.
    DeleteOrigin,
    /// Short notice attached to the button press acknowledgement.
    Notice(&'static str),
    /// Send `text` with a menu of the catalog's movie types.
    PromptTypes { text: String },
    /// Send `text` with a menu of the catalog's genres.
    PromptGenres { text: String },
    /// Record the search in the log, then report back with
    /// [`request_saved`].
    SaveRequest,
    /// Fetch the page after the cursor (see [`next_page`]), then report back
    /// with [`page_loaded`] or [`page_failed`].
    FetchPage,
    /// Append the movies of a fetched page to a logged request.
    RecordResults {
        request_id: DbId,
        movies: Vec<MovieRef>,
    },
    /// Send one message per movie, paced.
    ShowMovies(Vec<MovieRecord>),
    /// Send the user's `limit` most recent searches.
    ShowHistory { limit: u8 },
}

/// Outcome of a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// `None` ends the run and clears the user's session.
    pub session: Option<Session>,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(session: Session, effects: Vec<Effect>) -> Self {
        Self {
            session: Some(session),
            effects,
        }
    }

    fn finish(effects: Vec<Effect>) -> Self {
        Self {
            session: None,
            effects,
        }
    }

    fn reply(session: Session, message: Outgoing) -> Self {
        Self::stay(session, vec![Effect::Reply(message)])
    }

    fn outdated(session: Session) -> Self {
        Self::stay(session, vec![Effect::Notice(texts::OUTDATED_BUTTON)])
    }
}

/// A catalog page to fetch for a session in the paging stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub query: SearchQuery,
    pub page: u32,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Begin a fresh run of `wizard`.
pub fn start(wizard: Wizard, first_name: &str) -> Transition {
    let session = Session::new(wizard, first_name);
    let effect = match wizard {
        Wizard::ByFilters => Effect::PromptTypes {
            text: texts::filter_type_prompt(first_name),
        },
        Wizard::ByName => Effect::Reply(Outgoing::text(texts::name_query_prompt(first_name))),
        Wizard::History => Effect::Reply(
            Outgoing::text(texts::HISTORY_PROMPT).with_menu(menu::history_limit_menu()),
        ),
    };
    Transition::stay(session, vec![effect])
}

/// Feed one user answer to the session.
pub fn advance(session: Session, input: Input) -> Transition {
    match (session.stage.clone(), input) {
        (Stage::Paging(_), input) => advance_paging(session, input),

        (Stage::FilterType, Input::Choice(Choice::MovieType(value))) => {
            let label = menu::type_label(value.as_deref());
            let mut next = session;
            next.draft.movie_type = Some(Selection::new(label.clone(), value));
            next.stage = Stage::FilterGenre;
            Transition::stay(
                next,
                vec![
                    Effect::EditOrigin {
                        text: texts::type_chosen(&label),
                        menu: None,
                    },
                    Effect::PromptGenres {
                        text: texts::FILTER_GENRE_PROMPT.to_string(),
                    },
                ],
            )
        }

        (Stage::FilterGenre, Input::Choice(Choice::Genre(value))) => {
            let label = menu::genre_label(value.as_deref());
            let mut next = session;
            next.draft.genre = Some(Selection::new(label.clone(), value));
            next.stage = Stage::FilterRating;
            Transition::stay(
                next,
                vec![
                    Effect::EditOrigin {
                        text: texts::genre_chosen(&label),
                        menu: None,
                    },
                    Effect::Reply(
                        Outgoing::text(texts::FILTER_RATING_PROMPT)
                            .with_menu(menu::rating_menu(MIN_RATING, true)),
                    ),
                ],
            )
        }

        (Stage::FilterRating, Input::Choice(Choice::Rating(pick))) => advance_rating(session, pick),

        (Stage::FilterYear, Input::Text(text)) => match parse_year_range(&text) {
            Ok(years) => {
                let mut next = session;
                next.draft.years = Some(years);
                next.stage = Stage::FilterAmount;
                Transition::reply(
                    next,
                    Outgoing::text(texts::FILTER_AMOUNT_PROMPT).with_menu(menu::amount_menu()),
                )
            }
            Err(err) => Transition::reply(session, Outgoing::text(err.to_string())),
        },

        (Stage::FilterAmount, Input::Choice(Choice::Amount(amount)))
            if FILTER_PAGE_SIZES.contains(&amount) =>
        {
            let Some(criteria) = criteria(&session, amount) else {
                return Transition::finish(vec![Effect::Reply(Outgoing::text(
                    texts::INTERNAL_FAILURE,
                ))]);
            };
            enter_paging(
                session,
                SearchQuery::ByFilters(criteria),
                vec![Effect::DeleteOrigin],
            )
        }

        (Stage::NameQuery, Input::Text(text)) => {
            let query = text.trim();
            if query.is_empty() {
                let prompt = texts::name_query_prompt(&session.first_name);
                return Transition::reply(session, Outgoing::text(prompt));
            }
            let mut next = session;
            next.draft.query = Some(query.to_string());
            next.stage = Stage::NameAmount;
            let prompt = texts::name_amount_prompt(&next.first_name);
            Transition::reply(next, Outgoing::text(prompt))
        }

        (Stage::NameAmount, Input::Text(text)) => match validate_amount(&text, NAME_PAGE_SIZES) {
            Ok(page_size) => {
                let Some(query) = session.draft.query.clone() else {
                    return Transition::finish(vec![Effect::Reply(Outgoing::text(
                        texts::INTERNAL_FAILURE,
                    ))]);
                };
                enter_paging(
                    session,
                    SearchQuery::ByName(NameQuery { query, page_size }),
                    Vec::new(),
                )
            }
            Err(err) => Transition::reply(session, Outgoing::text(err.to_string())),
        },

        (Stage::HistoryLimit, Input::Choice(Choice::HistoryLimit(limit)))
            if HISTORY_LIMITS.contains(&limit) =>
        {
            Transition::finish(vec![Effect::ShowHistory { limit }])
        }

        (_, Input::Choice(_)) => Transition::outdated(session),

        // Every stage left expects a button press.
        (_, Input::Text(_)) => Transition::reply(session, Outgoing::text(texts::USE_BUTTONS)),
    }
}

fn advance_rating(session: Session, pick: RatingPick) -> Transition {
    let range = match (pick, session.draft.rating_min) {
        (RatingPick::Any, None) => RatingRange::ANY,
        (RatingPick::Value(min), None) if is_rating(min) && min < MAX_RATING => {
            let mut next = session;
            next.draft.rating_min = Some(min);
            return Transition::stay(
                next,
                vec![Effect::EditOrigin {
                    text: texts::rating_min_chosen(min),
                    menu: Some(menu::rating_menu(min + 1, false)),
                }],
            );
        }
        (RatingPick::Value(max), Some(min)) if max > min => match RatingRange::new(min, max) {
            Ok(range) => range,
            Err(_) => return Transition::outdated(session),
        },
        _ => return Transition::outdated(session),
    };

    let mut next = session;
    next.draft.rating = Some(range);
    next.stage = Stage::FilterYear;
    Transition::stay(
        next,
        vec![
            Effect::EditOrigin {
                text: texts::rating_chosen(range.min(), range.max()),
                menu: None,
            },
            Effect::Reply(Outgoing::text(texts::FILTER_YEAR_PROMPT)),
        ],
    )
}

fn advance_paging(session: Session, input: Input) -> Transition {
    match input {
        Input::Choice(Choice::Page(PageAction::Next)) => {
            Transition::stay(session, vec![Effect::DeleteOrigin, Effect::FetchPage])
        }
        Input::Choice(Choice::Page(PageAction::Stop)) => Transition::finish(vec![Effect::EditOrigin {
            text: texts::SEARCH_STOPPED.to_string(),
            menu: None,
        }]),
        Input::Choice(_) => Transition::outdated(session),
        Input::Text(text) => {
            let word = text.to_lowercase();
            if word.contains(NEXT_WORD) {
                Transition::stay(session, vec![Effect::FetchPage])
            } else if word.contains(STOP_WORD) {
                Transition::finish(vec![Effect::Reply(Outgoing::text(texts::SEARCH_STOPPED))])
            } else {
                Transition::reply(
                    session,
                    Outgoing::text(texts::MORE_RESULTS).with_menu(menu::pagination_menu()),
                )
            }
        }
    }
}

fn criteria(session: &Session, page_size: u8) -> Option<FilterCriteria> {
    let draft = &session.draft;
    Some(FilterCriteria {
        movie_type: draft.movie_type.clone()?,
        genre: draft.genre.clone()?,
        rating: draft.rating?,
        years: draft.years?,
        page_size,
    })
}

/// All criteria are known: log the search and show its first page.
fn enter_paging(session: Session, query: SearchQuery, mut effects: Vec<Effect>) -> Transition {
    let mut next = session;
    next.stage = Stage::Paging(Paging {
        query,
        page: 0,
        request_id: None,
    });
    effects.extend([Effect::SaveRequest, Effect::FetchPage]);
    Transition::stay(next, effects)
}

// ---------------------------------------------------------------------------
// Paging callbacks
// ---------------------------------------------------------------------------

/// The page after the cursor, if the session is paging.
pub fn next_page(session: &Session) -> Option<PageRequest> {
    session.paging().map(|paging| PageRequest {
        query: paging.query.clone(),
        page: paging.page + 1,
    })
}

/// Attach the logged request's id to a paging session.
pub fn request_saved(session: Session, request_id: DbId) -> Session {
    let mut next = session;
    if let Stage::Paging(paging) = &mut next.stage {
        paging.request_id = Some(request_id);
    }
    next
}

/// A page arrived: commit the cursor, log and show the movies, and decide
/// whether the search goes on.
pub fn page_loaded(session: Session, request: &PageRequest, page: ResultPage) -> Transition {
    let mut next = session;
    let mut effects = Vec::new();

    if let Stage::Paging(paging) = &mut next.stage {
        paging.page = request.page;
        if let Some(request_id) = paging.request_id {
            effects.push(Effect::RecordResults {
                request_id,
                movies: page
                    .movies
                    .iter()
                    .map(|m| MovieRef {
                        catalog_id: m.id,
                        title: m.full_title(),
                    })
                    .collect(),
            });
        }
    }

    let exhausted = page.is_exhausted();
    let total_pages = page.total_pages;
    if page.movies.is_empty() {
        effects.push(Effect::Reply(Outgoing::text(texts::NOTHING_FOUND)));
    } else {
        effects.push(Effect::ShowMovies(page.movies));
    }

    if exhausted {
        if total_pages != 0 {
            effects.push(Effect::Reply(Outgoing::text(texts::NOTHING_MORE)));
        }
        return Transition::finish(effects);
    }

    effects.push(Effect::Reply(
        Outgoing::text(texts::MORE_RESULTS).with_menu(menu::pagination_menu()),
    ));
    Transition::stay(next, effects)
}

/// A page could not be fetched: keep the cursor and let the user retry.
pub fn page_failed(session: Session) -> Transition {
    Transition::reply(
        session,
        Outgoing::text(texts::TRY_AGAIN).with_menu(menu::pagination_menu()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn choice(c: Choice) -> Input {
        Input::Choice(c)
    }

    fn text(t: &str) -> Input {
        Input::Text(t.to_string())
    }

    fn step(session: Session, input: Input) -> (Session, Vec<Effect>) {
        let t = advance(session, input);
        (t.session.expect("session kept"), t.effects)
    }

    fn movie(id: i64) -> MovieRecord {
        MovieRecord {
            id,
            original_title: format!("Movie {id}"),
            alternative_title: None,
            year: 2000,
            rating_kp: 7.0,
            rating_imdb: 7.1,
            genres: vec![],
            description: None,
            poster_url: None,
        }
    }

    fn page(current: u32, total: u32, ids: &[i64]) -> ResultPage {
        ResultPage {
            current_page: current,
            total_pages: total,
            total_count: u64::from(total) * 2,
            movies: ids.iter().copied().map(movie).collect(),
        }
    }

    fn at_rating() -> Session {
        let s = start(Wizard::ByFilters, "Анна").session.unwrap();
        let (s, _) = step(s, choice(Choice::MovieType(Some("movie".to_string()))));
        let (s, _) = step(s, choice(Choice::Genre(None)));
        assert_eq!(s.stage, Stage::FilterRating);
        s
    }

    fn paging_by_name(page_size: u8) -> Session {
        let s = start(Wizard::ByName, "Анна").session.unwrap();
        let (s, _) = step(s, text("Matrix"));
        let (s, effects) = step(s, text(&page_size.to_string()));
        assert_eq!(effects, vec![Effect::SaveRequest, Effect::FetchPage]);
        request_saved(s, 11)
    }

    #[test]
    fn filter_wizard_collects_labels_and_values() {
        let s = start(Wizard::ByFilters, "Анна").session.unwrap();
        let (s, effects) = step(s, choice(Choice::MovieType(Some("movie".to_string()))));
        assert_eq!(
            s.draft.movie_type,
            Some(Selection::new("Фильм", Some("movie".to_string())))
        );
        assert_matches!(&effects[1], Effect::PromptGenres { .. });

        let (s, _) = step(s, choice(Choice::Genre(None)));
        assert_eq!(s.draft.genre, Some(Selection::new("Любой", None)));
    }

    #[test]
    fn rating_two_step_accumulation() {
        let (s, effects) = step(at_rating(), choice(Choice::Rating(RatingPick::Value(5))));
        assert_eq!(s.stage, Stage::FilterRating);
        assert_eq!(s.draft.rating_min, Some(5));
        assert_matches!(&effects[0], Effect::EditOrigin { menu: Some(_), .. });

        let (s, effects) = step(s, choice(Choice::Rating(RatingPick::Value(8))));
        assert_eq!(s.stage, Stage::FilterYear);
        assert_eq!(s.draft.rating, Some(RatingRange::new(5, 8).unwrap()));
        assert_eq!(
            effects[0],
            Effect::EditOrigin {
                text: "Выбранный рейтинг: 5-8".to_string(),
                menu: None
            }
        );
    }

    #[test]
    fn rating_any_advances_immediately_with_full_range() {
        let (s, _) = step(at_rating(), choice(Choice::Rating(RatingPick::Any)));
        assert_eq!(s.stage, Stage::FilterYear);
        assert_eq!(s.draft.rating, Some(RatingRange::ANY));
    }

    #[test]
    fn rating_max_below_min_is_outdated() {
        let (s, _) = step(at_rating(), choice(Choice::Rating(RatingPick::Value(7))));
        let (s, effects) = step(s, choice(Choice::Rating(RatingPick::Value(3))));
        assert_eq!(s.stage, Stage::FilterRating);
        assert_eq!(effects, vec![Effect::Notice(texts::OUTDATED_BUTTON)]);
    }

    #[test]
    fn year_step_self_loops_on_invalid_input() {
        let (s, _) = step(at_rating(), choice(Choice::Rating(RatingPick::Any)));
        let (s, effects) = step(s, text("1990 1980"));
        assert_eq!(s.stage, Stage::FilterYear);
        assert_matches!(&effects[0], Effect::Reply(Outgoing::Text { text, .. }) if text.contains("меньше"));

        let (s, _) = step(s, text("1990 2000"));
        assert_eq!(s.stage, Stage::FilterAmount);
    }

    #[test]
    fn filter_amount_enters_paging() {
        let (s, _) = step(at_rating(), choice(Choice::Rating(RatingPick::Any)));
        let (s, _) = step(s, text("2010 2020"));
        let (s, effects) = step(s, choice(Choice::Amount(3)));
        assert_eq!(
            effects,
            vec![Effect::DeleteOrigin, Effect::SaveRequest, Effect::FetchPage]
        );
        let paging = s.paging().unwrap();
        assert_eq!(paging.page, 0);
        assert_matches!(&paging.query, SearchQuery::ByFilters(c) if c.page_size == 3 && c.years.min() == 2010);
    }

    #[test]
    fn name_amount_validation() {
        let s = start(Wizard::ByName, "Анна").session.unwrap();
        let (s, _) = step(s, text("Matrix"));
        let (s, effects) = step(s, text("9"));
        assert_eq!(s.stage, Stage::NameAmount);
        assert_matches!(&effects[0], Effect::Reply(_));

        let (s, _) = step(s, text("3"));
        assert_eq!(
            next_page(&s),
            Some(PageRequest {
                query: SearchQuery::ByName(NameQuery {
                    query: "Matrix".to_string(),
                    page_size: 3
                }),
                page: 1
            })
        );
    }

    #[test]
    fn text_at_menu_stage_hints_buttons() {
        let s = start(Wizard::History, "Анна").session.unwrap();
        let (s, effects) = step(s, text("5"));
        assert_eq!(s.stage, Stage::HistoryLimit);
        assert_eq!(effects, vec![Effect::Reply(Outgoing::text(texts::USE_BUTTONS))]);
    }

    #[test]
    fn history_limit_finishes() {
        let s = start(Wizard::History, "Анна").session.unwrap();
        let t = advance(s, choice(Choice::HistoryLimit(4)));
        assert!(t.session.is_none());
        assert_eq!(t.effects, vec![Effect::ShowHistory { limit: 4 }]);
    }

    #[test]
    fn stale_choice_keeps_session() {
        let s = start(Wizard::ByName, "Анна").session.unwrap();
        let t = advance(s.clone(), choice(Choice::Amount(2)));
        assert_eq!(t.session, Some(s));
        assert_eq!(t.effects, vec![Effect::Notice(texts::OUTDATED_BUTTON)]);
    }

    #[test]
    fn pagination_terminates_on_last_page() {
        let mut session = paging_by_name(2);
        let total = 3;
        let mut fetched = Vec::new();

        loop {
            let request = next_page(&session).unwrap();
            fetched.push(request.page);
            let t = page_loaded(session, &request, page(request.page, total, &[1, 2]));
            match t.session {
                Some(s) => {
                    assert_matches!(t.effects.last(), Some(Effect::Reply(o)) if o.menu().is_some());
                    let (s, effects) = step(s, choice(Choice::Page(PageAction::Next)));
                    assert_eq!(effects, vec![Effect::DeleteOrigin, Effect::FetchPage]);
                    session = s;
                }
                None => {
                    assert_eq!(
                        t.effects.last(),
                        Some(&Effect::Reply(Outgoing::text(texts::NOTHING_MORE)))
                    );
                    break;
                }
            }
        }
        assert_eq!(fetched, vec![1, 2, 3]);
    }

    #[test]
    fn zero_total_sends_no_nothing_more() {
        let session = paging_by_name(3);
        let request = next_page(&session).unwrap();
        let t = page_loaded(session, &request, page(1, 0, &[]));
        assert!(t.session.is_none());
        assert_eq!(
            t.effects,
            vec![
                Effect::RecordResults {
                    request_id: 11,
                    movies: vec![]
                },
                Effect::Reply(Outgoing::text(texts::NOTHING_FOUND)),
            ]
        );
    }

    #[test]
    fn loaded_page_records_full_titles() {
        let session = paging_by_name(1);
        let request = next_page(&session).unwrap();
        let mut p = page(1, 5, &[301]);
        p.movies[0].alternative_title = Some("Alt".to_string());
        let t = page_loaded(session, &request, p);
        assert_eq!(
            t.effects[0],
            Effect::RecordResults {
                request_id: 11,
                movies: vec![MovieRef {
                    catalog_id: 301,
                    title: "Movie 301 (Alt)".to_string()
                }]
            }
        );
        assert_eq!(t.session.unwrap().paging().unwrap().page, 1);
    }

    #[test]
    fn failed_page_keeps_cursor() {
        let session = paging_by_name(2);
        let t = page_failed(session.clone());
        assert_eq!(t.session.as_ref(), Some(&session));
        assert_eq!(next_page(&session).unwrap().page, 1);
        assert_matches!(&t.effects[0], Effect::Reply(o) if o.menu().is_some());
    }

    #[test]
    fn stop_ends_the_run() {
        let t = advance(paging_by_name(2), choice(Choice::Page(PageAction::Stop)));
        assert!(t.session.is_none());
        let t = advance(paging_by_name(2), text("Хватит"));
        assert!(t.session.is_none());
        assert_eq!(t.effects, vec![Effect::Reply(Outgoing::text(texts::SEARCH_STOPPED))]);
    }

    #[test]
    fn typed_next_fetches_without_deleting() {
        let (_, effects) = step(paging_by_name(2), text("Далее"));
        assert_eq!(effects, vec![Effect::FetchPage]);
    }
}
