//! HTML rendering of movies for the chat platform.

use crate::movie::MovieRecord;
use crate::outgoing::Outgoing;

/// Poster shown for movies the catalog has no picture for.
pub const FALLBACK_POSTER_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/a/a1/Out_Of_Poster.jpg";

/// Longest description block rendered, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 800;

const ELLIPSIS: &str = "...";
const UNRATED: &str = "нет оценки";
const NO_DESCRIPTION: &str = "отсутствует";

/// Escape text for the platform's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn rating(value: f64) -> String {
    if value <= 0.0 {
        UNRATED.to_string()
    } else if value.fract() == 0.0 {
        // Whole ratings keep one decimal: "8.0", not "8".
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Description starting on its own line, cut to [`MAX_DESCRIPTION_CHARS`].
fn description(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return NO_DESCRIPTION.to_string();
    };
    let block = format!("\n{text}");
    if block.chars().count() <= MAX_DESCRIPTION_CHARS {
        return block;
    }
    let keep = MAX_DESCRIPTION_CHARS - ELLIPSIS.len();
    let mut cut: String = block.chars().take(keep).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// Caption describing one movie.
pub fn movie_to_html(movie: &MovieRecord) -> String {
    let alt_title = movie
        .alternative_title
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| format!("({})", escape_html(t)))
        .unwrap_or_default();
    let genres = movie.genres.join(", ");

    [
        format!(
            "<a href=\"{}\"><b>{}</b> {}</a>",
            movie.detail_url(),
            escape_html(&movie.original_title),
            alt_title
        ),
        String::new(),
        format!("<b>Год выхода:</b> <i>{}</i>", movie.year),
        format!(
            "<b>Рейтинг Кинопоиска/IMDB:</b> <i>{} / {}</i>",
            rating(movie.rating_kp),
            rating(movie.rating_imdb)
        ),
        format!("<b>Жанр(ы):</b> <i>{}</i>", escape_html(&genres)),
        String::new(),
        format!(
            "<b>Описание:</b> <i>{}</i>",
            escape_html(&description(movie.description.as_deref()))
        ),
    ]
    .join("\n")
}

/// Photo message for one movie, with the fallback poster when needed.
pub fn movie_message(movie: &MovieRecord) -> Outgoing {
    let url = movie
        .poster_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .unwrap_or(FALLBACK_POSTER_URL);
    Outgoing::Photo {
        url: url.to_string(),
        caption: movie_to_html(movie),
    }
}
