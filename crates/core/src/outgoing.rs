//! Transport-neutral outbound messages.

use crate::choice::Choice;

/// A labelled button that reports a [`Choice`] when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub choice: Choice,
}

impl Button {
    pub fn new(label: impl Into<String>, choice: Choice) -> Self {
        Self {
            label: label.into(),
            choice,
        }
    }
}

/// A set of mutually exclusive choices attached to a message, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub rows: Vec<Vec<Button>>,
}

impl Menu {
    /// Lay `buttons` out in rows of at most `row_width`.
    pub fn grid(buttons: Vec<Button>, row_width: usize) -> Self {
        let width = row_width.max(1);
        let mut rows = Vec::new();
        let mut row = Vec::with_capacity(width);
        for button in buttons {
            row.push(button);
            if row.len() == width {
                rows.push(std::mem::take(&mut row));
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
        Self { rows }
    }

    /// Append a full-width row holding a single button.
    pub fn push_row(&mut self, button: Button) {
        self.rows.push(vec![button]);
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }
}

/// A message to deliver to a chat.
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    Text {
        text: String,
        html: bool,
        menu: Option<Menu>,
    },
    /// A picture with an HTML caption.
    Photo { url: String, caption: String },
}

impl Outgoing {
    /// Plain text without markup.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            html: false,
            menu: None,
        }
    }

    /// Text rendered as HTML.
    pub fn html(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            html: true,
            menu: None,
        }
    }

    /// Attach a menu. Photos carry no menu, so this is a no-op for them.
    pub fn with_menu(self, menu: Menu) -> Self {
        match self {
            Self::Text { text, html, .. } => Self::Text {
                text,
                html,
                menu: Some(menu),
            },
            photo @ Self::Photo { .. } => photo,
        }
    }

    pub fn menu(&self) -> Option<&Menu> {
        match self {
            Self::Text { menu, .. } => menu.as_ref(),
            Self::Photo { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buttons(n: u8) -> Vec<Button> {
        (1..=n)
            .map(|i| Button::new(i.to_string(), Choice::Amount(i)))
            .collect()
    }

    #[test]
    fn grid_fills_rows_left_to_right() {
        let menu = Menu::grid(buttons(7), 5);
        assert_eq!(menu.rows.len(), 2);
        assert_eq!(menu.rows[0].len(), 5);
        assert_eq!(menu.rows[1].len(), 2);
        assert_eq!(menu.buttons().count(), 7);
    }

    #[test]
    fn grid_with_zero_width_uses_single_column() {
        let menu = Menu::grid(buttons(3), 0);
        assert_eq!(menu.rows.len(), 3);
    }

    #[test]
    fn photos_ignore_menus() {
        let photo = Outgoing::Photo {
            url: "u".to_string(),
            caption: "c".to_string(),
        };
        assert!(photo.with_menu(Menu::grid(buttons(1), 1)).menu().is_none());
    }
}
