//! Telegram Bot API objects, limited to the fields the bot reads or sends.

use kino_core::outgoing::Menu;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// Response envelope of every Bot API method.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl From<&Menu> for InlineKeyboardMarkup {
    fn from(menu: &Menu) -> Self {
        Self {
            inline_keyboard: menu
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| InlineKeyboardButton {
                            text: button.label.clone(),
                            callback_data: button.choice.encode(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kino_core::menu;

    #[test]
    fn menu_becomes_inline_keyboard() {
        let markup = InlineKeyboardMarkup::from(&menu::pagination_menu());
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inline_keyboard": [[
                    {"text": "Хватит", "callback_data": "p:stop"},
                    {"text": "Далее", "callback_data": "p:next"}
                ]]
            })
        );
    }

    #[test]
    fn full_name_joins_first_and_last() {
        let user = User {
            id: 1,
            first_name: "Анна".to_string(),
            last_name: Some("Каренина".to_string()),
            username: None,
        };
        assert_eq!(user.full_name(), "Анна Каренина");
    }
}
