//! Catalog-facing domain types: movies, result pages and search criteria.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Earliest release year accepted in a year filter.
pub const MIN_YEAR: i32 = 1850;

/// Lowest catalog rating a filter can ask for.
pub const MIN_RATING: u8 = 1;

/// Highest catalog rating a filter can ask for.
pub const MAX_RATING: u8 = 10;

/// Base address of a movie's page on the catalog website.
const DETAIL_URL_BASE: &str = "https://www.kinopoisk.ru/film";

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

/// A single movie returned by the catalog.
///
/// Ratings of `0.0` mean "unrated"; both catalog response shapes are
/// normalized into this struct by the catalog client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: i64,
    pub original_title: String,
    pub alternative_title: Option<String>,
    pub year: i32,
    pub rating_kp: f64,
    pub rating_imdb: f64,
    pub genres: Vec<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
}

impl MovieRecord {
    /// Link to the movie's page on the catalog website.
    pub fn detail_url(&self) -> String {
        format!("{DETAIL_URL_BASE}/{}/", self.id)
    }

    /// Original title followed by the alternative one in parentheses.
    pub fn full_title(&self) -> String {
        full_title(&self.original_title, self.alternative_title.as_deref())
    }
}

/// Combine an original and an optional alternative title.
pub fn full_title(original: &str, alternative: Option<&str>) -> String {
    match alternative {
        Some(alt) if !alt.is_empty() => format!("{original} ({alt})"),
        _ => original.to_string(),
    }
}

/// One page of a paginated catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub movies: Vec<MovieRecord>,
}

impl ResultPage {
    /// Whether the catalog reports pages after this one.
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether this page is the last one the query will ever produce.
    pub fn is_exhausted(&self) -> bool {
        self.total_pages <= self.current_page
    }
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Inclusive release-year range, `MIN_YEAR <= min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Result<Self, CoreError> {
        if min < MIN_YEAR || max < MIN_YEAR {
            return Err(CoreError::Validation(format!(
                "Years must be at least {MIN_YEAR}, got {min}-{max}"
            )));
        }
        if min > max {
            return Err(CoreError::Validation(format!(
                "Minimum year {min} is greater than maximum year {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Catalog query parameter form, `"min-max"`.
    pub fn as_param(&self) -> String {
        format!("{}-{}", self.min, self.max)
    }
}

/// Inclusive catalog rating range inside `[MIN_RATING, MAX_RATING]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRange {
    min: u8,
    max: u8,
}

impl RatingRange {
    /// The whole rating scale, used when the user picks "any".
    pub const ANY: RatingRange = RatingRange {
        min: MIN_RATING,
        max: MAX_RATING,
    };

    pub fn new(min: u8, max: u8) -> Result<Self, CoreError> {
        if !is_rating(min) || !is_rating(max) {
            return Err(CoreError::Validation(format!(
                "Ratings must be between {MIN_RATING} and {MAX_RATING}, got {min}-{max}"
            )));
        }
        if min > max {
            return Err(CoreError::Validation(format!(
                "Minimum rating {min} is greater than maximum rating {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    /// Catalog query parameter form, `"min-max"`.
    pub fn as_param(&self) -> String {
        format!("{}-{}", self.min, self.max)
    }
}

/// Whether `value` lies on the catalog rating scale.
pub fn is_rating(value: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// A menu pick for a categorical filter.
///
/// `value` is what the catalog understands; `None` is the "any" choice and
/// means the filter is not applied. `display` is the label the user saw and
/// is what the search log records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub display: String,
    pub value: Option<String>,
}

impl Selection {
    pub fn new(display: impl Into<String>, value: Option<String>) -> Self {
        Self {
            display: display.into(),
            value,
        }
    }
}

/// Finalized filters for a `byfilters` search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub movie_type: Selection,
    pub genre: Selection,
    pub rating: RatingRange,
    pub years: YearRange,
    pub page_size: u8,
}

/// Finalized title search for a `byname` search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameQuery {
    pub query: String,
    pub page_size: u8,
}

/// A finished wizard's catalog query, ready to be paged through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchQuery {
    ByName(NameQuery),
    ByFilters(FilterCriteria),
}

impl SearchQuery {
    pub fn page_size(&self) -> u8 {
        match self {
            Self::ByName(q) => q.page_size,
            Self::ByFilters(c) => c.page_size,
        }
    }

    pub fn command(&self) -> CommandKind {
        match self {
            Self::ByName(_) => CommandKind::ByName,
            Self::ByFilters(_) => CommandKind::ByFilters,
        }
    }
}

// ---------------------------------------------------------------------------
// Command kinds
// ---------------------------------------------------------------------------

/// The kinds of search a user can run and that the search log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Random,
    ByName,
    ByFilters,
}

impl CommandKind {
    /// Parse a command string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "random" => Ok(Self::Random),
            "byname" => Ok(Self::ByName),
            "byfilters" => Ok(Self::ByFilters),
            _ => Err(CoreError::UnknownCommand(s.to_string())),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::ByName => "byname",
            Self::ByFilters => "byfilters",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
