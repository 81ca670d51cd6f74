//! Menu choices and their compact callback encoding.
//!
//! A button carries `prefix:value`; the label a user saw is recomputed from
//! the value (see [`crate::menu`]), so nothing but the value has to fit in
//! the chat platform's callback payload.

/// Maximum callback payload size accepted by the chat platform, in bytes.
pub const MAX_CALLBACK_BYTES: usize = 64;

/// Wire token for the "any" button of the type, genre and rating menus.
pub const ANY: &str = "any";

/// First rating prompt: a bound or the whole scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingPick {
    Any,
    Value(u8),
}

/// Pagination buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Next,
    Stop,
}

/// A decoded menu button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// `None` is the "any" button.
    MovieType(Option<String>),
    /// `None` is the "any" button.
    Genre(Option<String>),
    Rating(RatingPick),
    Amount(u8),
    Page(PageAction),
    HistoryLimit(u8),
    HistoryMovie(i64),
}

impl Choice {
    /// Encode for a button's callback payload.
    pub fn encode(&self) -> String {
        match self {
            Self::MovieType(value) => format!("t:{}", value.as_deref().unwrap_or(ANY)),
            Self::Genre(value) => format!("g:{}", value.as_deref().unwrap_or(ANY)),
            Self::Rating(RatingPick::Any) => format!("r:{ANY}"),
            Self::Rating(RatingPick::Value(n)) => format!("r:{n}"),
            Self::Amount(n) => format!("a:{n}"),
            Self::Page(PageAction::Next) => "p:next".to_string(),
            Self::Page(PageAction::Stop) => "p:stop".to_string(),
            Self::HistoryLimit(n) => format!("h:{n}"),
            Self::HistoryMovie(id) => format!("m:{id}"),
        }
    }

    /// Decode a callback payload. Unknown or malformed payloads yield `None`.
    pub fn decode(data: &str) -> Option<Self> {
        let (prefix, value) = data.split_once(':')?;
        let choice = match prefix {
            "t" => Self::MovieType(optional(value)?),
            "g" => Self::Genre(optional(value)?),
            "r" if value == ANY => Self::Rating(RatingPick::Any),
            "r" => Self::Rating(RatingPick::Value(value.parse().ok()?)),
            "a" => Self::Amount(value.parse().ok()?),
            "p" => match value {
                "next" => Self::Page(PageAction::Next),
                "stop" => Self::Page(PageAction::Stop),
                _ => return None,
            },
            "h" => Self::HistoryLimit(value.parse().ok()?),
            "m" => Self::HistoryMovie(value.parse().ok()?),
            _ => return None,
        };
        Some(choice)
    }

    /// Whether the encoded form fits in a callback payload.
    pub fn fits_callback(&self) -> bool {
        self.encode().len() <= MAX_CALLBACK_BYTES
    }
}

fn optional(value: &str) -> Option<Option<String>> {
    match value {
        "" => None,
        ANY => Some(None),
        v => Some(Some(v.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_recovers_encoded_choice() {
        let choices = [
            Choice::MovieType(Some("tv-series".to_string())),
            Choice::MovieType(None),
            Choice::Genre(Some("фильм-нуар".to_string())),
            Choice::Genre(None),
            Choice::Rating(RatingPick::Any),
            Choice::Rating(RatingPick::Value(7)),
            Choice::Amount(3),
            Choice::Page(PageAction::Next),
            Choice::Page(PageAction::Stop),
            Choice::HistoryLimit(10),
            Choice::HistoryMovie(326),
        ];
        for choice in choices {
            assert_eq!(Choice::decode(&choice.encode()), Some(choice));
        }
    }

    #[test]
    fn any_sentinel_encoding() {
        assert_eq!(Choice::MovieType(None).encode(), "t:any");
        assert_eq!(Choice::Rating(RatingPick::Any).encode(), "r:any");
    }

    #[test]
    fn genre_value_may_contain_separator() {
        assert_eq!(
            Choice::decode("g:sci:fi"),
            Some(Choice::Genre(Some("sci:fi".to_string())))
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(Choice::decode(""), None);
        assert_eq!(Choice::decode("x:1"), None);
        assert_eq!(Choice::decode("a:lots"), None);
        assert_eq!(Choice::decode("p:later"), None);
        assert_eq!(Choice::decode("t:"), None);
        assert_eq!(Choice::decode("m"), None);
    }

    #[test]
    fn long_values_do_not_fit() {
        let long = "ж".repeat(40);
        assert!(!Choice::Genre(Some(long)).fits_callback());
        assert!(Choice::Genre(Some("документальный".to_string())).fits_callback());
    }
}
