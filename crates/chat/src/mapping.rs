//! Telegram update to inbound event mapping.

use kino_core::inbound::{Command, Inbound, InboundKind, Sender};

use crate::types::{Update, User};

fn sender(user: &User) -> Sender {
    Sender {
        user_id: user.id,
        first_name: user.first_name.clone(),
        full_name: user.full_name(),
    }
}

/// Map an update to an inbound event. Updates the bot does not act on
/// (edits, channel posts, stickers, ...) yield `None`.
pub fn to_inbound(update: Update) -> Option<Inbound> {
    if let Some(query) = update.callback_query {
        // Private chats share their id with the user.
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(query.from.id);
        return Some(Inbound {
            sender: sender(&query.from),
            chat_id,
            kind: InboundKind::Callback {
                callback_id: query.id,
                origin: query.message.map(|m| m.message_id),
                data: query.data.unwrap_or_default(),
            },
        });
    }

    let message = update.message?;
    let from = message.from.as_ref()?;
    let text = message.text?;
    let kind = match Command::parse(&text) {
        Some(command) => InboundKind::Command(command),
        None => InboundKind::Text(text),
    };
    Some(Inbound {
        sender: sender(from),
        chat_id: message.chat.id,
        kind,
    })
}
