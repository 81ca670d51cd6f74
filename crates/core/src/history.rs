//! Past searches as shown by the history command.

use crate::render::escape_html;
use crate::types::Timestamp;

/// Date format used in history headers.
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// A movie shown for a past request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRef {
    pub catalog_id: i64,
    pub title: String,
}

/// What a past request searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryKind {
    Random,
    ByName {
        title: String,
    },
    /// Type and genre are the labels the user picked.
    ByFilters {
        movie_type: String,
        genre: String,
        year_min: i32,
        year_max: i32,
        rating_min: u8,
        rating_max: u8,
    },
}

/// One past request with the most recent page of movies shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub created_at: Timestamp,
    pub kind: HistoryKind,
    pub movies: Vec<MovieRef>,
}

impl HistoryEntry {
    pub fn to_html(&self) -> String {
        let date = self.created_at.format(DATE_FORMAT);
        let movies_line = if self.movies.is_empty() {
            "По этому запросу нет фильмов"
        } else {
            "Последние найденные фильмы:"
        };

        match &self.kind {
            HistoryKind::Random => format!("<b>Случайный фильм</b> - /random (<i>{date}</i>):"),
            HistoryKind::ByName { title } => [
                format!("<b>Поиск по названию</b> - /byname (<i>{date}</i>):"),
                format!("<b>Название:</b> <i>{}</i>", escape_html(title)),
                movies_line.to_string(),
            ]
            .join("\n"),
            HistoryKind::ByFilters {
                movie_type,
                genre,
                year_min,
                year_max,
                rating_min,
                rating_max,
            } => [
                format!("<b>Поиск c фильтрами</b> - /byfilters (<i>{date}</i>):"),
                format!("<b>Тип:</b> <i>{}</i>", escape_html(movie_type)),
                format!("<b>Жанр:</b> <i>{}</i>", escape_html(genre)),
                format!("<b>Год выхода:</b> <i>{year_min}-{year_max}</i>"),
                format!("<b>Рейтинг Кинопоиска:</b> <i>{rating_min}-{rating_max}</i>"),
                movies_line.to_string(),
            ]
            .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(kind: HistoryKind, movies: Vec<MovieRef>) -> HistoryEntry {
        HistoryEntry {
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap(),
            kind,
            movies,
        }
    }

    #[test]
    fn random_header() {
        let html = entry(HistoryKind::Random, vec![]).to_html();
        assert_eq!(html, "<b>Случайный фильм</b> - /random (<i>05.03.2024 14:07</i>):");
    }

    #[test]
    fn by_name_lists_title() {
        let movies = vec![MovieRef {
            catalog_id: 301,
            title: "Матрица".to_string(),
        }];
        let html = entry(
            HistoryKind::ByName {
                title: "Matrix".to_string(),
            },
            movies,
        )
        .to_html();
        assert_eq!(
            html,
            "<b>Поиск по названию</b> - /byname (<i>05.03.2024 14:07</i>):\n\
             <b>Название:</b> <i>Matrix</i>\n\
             Последние найденные фильмы:"
        );
    }

    #[test]
    fn by_filters_without_movies() {
        let html = entry(
            HistoryKind::ByFilters {
                movie_type: "Фильм".to_string(),
                genre: "Любой".to_string(),
                year_min: 1990,
                year_max: 2000,
                rating_min: 1,
                rating_max: 10,
            },
            vec![],
        )
        .to_html();
        let lines: Vec<&str> = html.lines().collect();
        assert_eq!(lines[1], "<b>Тип:</b> <i>Фильм</i>");
        assert_eq!(lines[2], "<b>Жанр:</b> <i>Любой</i>");
        assert_eq!(lines[3], "<b>Год выхода:</b> <i>1990-2000</i>");
        assert_eq!(lines[4], "<b>Рейтинг Кинопоиска:</b> <i>1-10</i>");
        assert_eq!(lines[5], "По этому запросу нет фильмов");
    }
}
