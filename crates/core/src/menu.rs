//! Menu builders for every wizard prompt.
//!
//! Builders are pure: catalog-provided value lists go in, a [`Menu`] comes
//! out. Buttons whose callback would not fit the platform limit are left out
//! rather than sent broken.

use crate::choice::{Choice, PageAction, RatingPick};
use crate::movie::{MAX_RATING, MIN_RATING};
use crate::outgoing::{Button, Menu};
use crate::validation::{FILTER_PAGE_SIZES, HISTORY_LIMITS};

/// Label of the "any" button and of an unfiltered criterion.
pub const ANY_LABEL: &str = "Любой";

/// Genres the catalog lists that are not offered in the genre menu.
pub const HIDDEN_GENRES: [&str; 9] = [
    "аниме",
    "мультфильм",
    "для взрослых",
    "игра",
    "концерт",
    "новости",
    "реальное ТВ",
    "ток-шоу",
    "церемония",
];

/// Russian labels for the catalog's well-known movie types.
const TYPE_LABELS: [(&str, &str); 5] = [
    ("animated-series", "Анимационный сериал"),
    ("anime", "Аниме"),
    ("cartoon", "Мультфильм"),
    ("movie", "Фильм"),
    ("tv-series", "Сериал"),
];

const DEFAULT_ROW_WIDTH: usize = 3;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Display label for a movie type value; unknown types show as-is.
pub fn type_label(value: Option<&str>) -> String {
    match value {
        None => ANY_LABEL.to_string(),
        Some(v) => TYPE_LABELS
            .iter()
            .find(|(known, _)| *known == v)
            .map(|(_, label)| (*label).to_string())
            .unwrap_or_else(|| v.to_string()),
    }
}

/// Display label for a genre value: first letter upper-cased, rest lower.
pub fn genre_label(value: Option<&str>) -> String {
    let Some(v) = value else {
        return ANY_LABEL.to_string();
    };
    let mut chars = v.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn fitting(buttons: impl IntoIterator<Item = Button>) -> Vec<Button> {
    buttons
        .into_iter()
        .filter(|b| b.choice.fits_callback())
        .collect()
}

// ---------------------------------------------------------------------------
// Filter wizard
// ---------------------------------------------------------------------------

/// Movie types as listed by the catalog, followed by "any".
pub fn types_menu(types: &[String]) -> Menu {
    let buttons = fitting(types.iter().map(|t| {
        Button::new(type_label(Some(t)), Choice::MovieType(Some(t.clone())))
    }));
    let mut menu = Menu::grid(buttons, DEFAULT_ROW_WIDTH);
    menu.push_row(Button::new(ANY_LABEL, Choice::MovieType(None)));
    menu
}

/// Genres as listed by the catalog minus [`HIDDEN_GENRES`], followed by "any".
pub fn genres_menu(genres: &[String]) -> Menu {
    let buttons = fitting(
        genres
            .iter()
            .filter(|g| !HIDDEN_GENRES.contains(&g.as_str()))
            .map(|g| Button::new(genre_label(Some(g)), Choice::Genre(Some(g.clone())))),
    );
    let mut menu = Menu::grid(buttons, DEFAULT_ROW_WIDTH);
    menu.push_row(Button::new(ANY_LABEL, Choice::Genre(None)));
    menu
}

/// Rating prompt.
///
/// The first prompt offers `1..=9` plus "any"; the second offers everything
/// above the chosen minimum, so `max > min` always holds.
pub fn rating_menu(min_rating: u8, first_prompt: bool) -> Menu {
    let upper = if first_prompt { MAX_RATING - 1 } else { MAX_RATING };
    let lower = min_rating.max(MIN_RATING);
    let count = usize::from(MAX_RATING + 1).saturating_sub(usize::from(lower));
    let row_width = if count <= 8 { count } else { 5 };

    let buttons = (lower..=upper)
        .map(|n| Button::new(n.to_string(), Choice::Rating(RatingPick::Value(n))))
        .collect();
    let mut menu = Menu::grid(buttons, row_width);
    if first_prompt {
        menu.push_row(Button::new(ANY_LABEL, Choice::Rating(RatingPick::Any)));
    }
    menu
}

/// How many movies per page.
pub fn amount_menu() -> Menu {
    let buttons = FILTER_PAGE_SIZES
        .map(|n| Button::new(n.to_string(), Choice::Amount(n)))
        .collect();
    Menu::grid(buttons, FILTER_PAGE_SIZES.len())
}

/// Stop / next buttons shown under a page of results.
pub fn pagination_menu() -> Menu {
    Menu::grid(
        vec![
            Button::new("Хватит", Choice::Page(PageAction::Stop)),
            Button::new("Далее", Choice::Page(PageAction::Next)),
        ],
        2,
    )
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// How many past requests to show.
pub fn history_limit_menu() -> Menu {
    let buttons = HISTORY_LIMITS
        .map(|n| Button::new(n.to_string(), Choice::HistoryLimit(n)))
        .collect();
    Menu::grid(buttons, 5)
}

/// One button per movie shown for a past request; pressing it re-renders
/// the movie.
pub fn history_movies_menu<'a>(movies: impl IntoIterator<Item = (i64, &'a str)>) -> Menu {
    let buttons = movies
        .into_iter()
        .map(|(id, title)| Button::new(title, Choice::HistoryMovie(id)))
        .collect();
    Menu::grid(buttons, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(menu: &Menu) -> Vec<String> {
        menu.buttons().map(|b| b.label.clone()).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn known_types_get_russian_labels() {
        let menu = types_menu(&strings(&["movie", "tv-series", "mini-series"]));
        assert_eq!(labels(&menu), ["Фильм", "Сериал", "mini-series", "Любой"]);
        assert_eq!(
            menu.buttons().last().map(|b| b.choice.clone()),
            Some(Choice::MovieType(None))
        );
    }

    #[test]
    fn hidden_genres_are_filtered_and_labels_capitalized() {
        let menu = genres_menu(&strings(&["драма", "аниме", "реальное ТВ", "КОМЕДИЯ"]));
        assert_eq!(labels(&menu), ["Драма", "Комедия", "Любой"]);
        assert_eq!(
            menu.buttons().next().map(|b| b.choice.clone()),
            Some(Choice::Genre(Some("драма".to_string())))
        );
    }

    #[test]
    fn oversized_genre_values_are_skipped() {
        let long = "ж".repeat(40);
        let menu = genres_menu(&[long, "драма".to_string()]);
        assert_eq!(labels(&menu), ["Драма", "Любой"]);
    }

    #[test]
    fn first_rating_prompt_offers_one_to_nine_and_any() {
        let menu = rating_menu(MIN_RATING, true);
        let choices: Vec<Choice> = menu.buttons().map(|b| b.choice.clone()).collect();
        assert_eq!(choices.len(), 10);
        assert_eq!(choices[0], Choice::Rating(RatingPick::Value(1)));
        assert_eq!(choices[8], Choice::Rating(RatingPick::Value(9)));
        assert_eq!(choices[9], Choice::Rating(RatingPick::Any));
    }

    #[test]
    fn second_rating_prompt_offers_values_above_min() {
        let menu = rating_menu(6, false);
        assert_eq!(labels(&menu), ["6", "7", "8", "9", "10"]);
        assert_eq!(menu.rows.len(), 1);
    }

    #[test]
    fn amount_and_history_menus() {
        assert_eq!(labels(&amount_menu()), ["1", "2", "3", "4", "5"]);
        assert_eq!(history_limit_menu().buttons().count(), 10);
        assert_eq!(history_limit_menu().rows.len(), 2);
    }

    #[test]
    fn pagination_menu_has_stop_then_next() {
        assert_eq!(labels(&pagination_menu()), ["Хватит", "Далее"]);
    }

    #[test]
    fn history_movie_buttons_carry_catalog_ids() {
        let menu = history_movies_menu([(301, "Матрица (The Matrix)"), (42, "Солярис")]);
        assert_eq!(menu.rows.len(), 2);
        assert_eq!(menu.rows[1][0].choice, Choice::HistoryMovie(42));
    }

    #[test]
    fn labels_for_any() {
        assert_eq!(type_label(None), ANY_LABEL);
        assert_eq!(genre_label(None), ANY_LABEL);
        assert_eq!(genre_label(Some("фильм-нуар")), "Фильм-нуар");
    }
}
