//! Parsing and validation of free-text wizard answers.
//!
//! Every failure is a [`ValidationError`] whose `Display` text is the
//! user-facing re-prompt, so handlers can send it back as-is.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

use crate::movie::{YearRange, MIN_YEAR};

/// Page sizes a title search accepts.
pub const NAME_PAGE_SIZES: RangeInclusive<u8> = 1..=5;

/// Page sizes offered by the filter search menu.
pub const FILTER_PAGE_SIZES: RangeInclusive<u8> = 1..=5;

/// Number of past requests the history menu offers.
pub const HISTORY_LIMITS: RangeInclusive<u8> = 1..=10;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("valid regex"));

/// A malformed answer to a wizard prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Неправильный формат. Попробуйте ещё раз.")]
    YearFormat,

    #[error("Год слишком маленький. Укажите год больше 1850. Попробуйте ещё раз.")]
    YearTooSmall,

    #[error("Минимальный год должен быть меньше чем максимальный. Попробуйте ещё раз.")]
    YearOrder,

    #[error("Можно ввести только число от {min} до {max}\nПопробуйте ещё раз.")]
    AmountNotNumber { min: u8, max: u8 },

    #[error("Можно ввести только число от {min} до {max}\nПопробуйте ещё раз.")]
    AmountOutOfRange { min: u8, max: u8 },
}

/// Extract a release-year range from free text.
///
/// Takes the first two 4-digit numbers in the text, in order, whatever
/// separates them (`"1990 2000"`, `"1990-2000"`, `"с 1990 по 2000"`).
pub fn parse_year_range(text: &str) -> Result<YearRange, ValidationError> {
    let mut years = YEAR_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<i32>().ok());

    let (Some(min), Some(max)) = (years.next(), years.next()) else {
        return Err(ValidationError::YearFormat);
    };
    if min < MIN_YEAR || max < MIN_YEAR {
        return Err(ValidationError::YearTooSmall);
    }
    if min > max {
        return Err(ValidationError::YearOrder);
    }
    YearRange::new(min, max).map_err(|_| ValidationError::YearFormat)
}

/// Parse a bare integer answer and check it against `range`.
pub fn validate_amount(text: &str, range: RangeInclusive<u8>) -> Result<u8, ValidationError> {
    let (min, max) = (*range.start(), *range.end());
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::AmountNotNumber { min, max });
    }
    // All-digit input that overflows u8 is out of range, not malformed.
    match trimmed.parse::<u8>() {
        Ok(n) if range.contains(&n) => Ok(n),
        _ => Err(ValidationError::AmountOutOfRange { min, max }),
    }
}
