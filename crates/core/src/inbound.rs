//! Transport-neutral inbound events.

use crate::types::{ChatId, MessageId, UserId};

/// Bot commands, in the order they are advertised to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Random,
    ByName,
    ByFilters,
    History,
    Cancel,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Self::Start,
        Self::Help,
        Self::Random,
        Self::ByName,
        Self::ByFilters,
        Self::History,
        Self::Cancel,
    ];

    /// Command name without the leading slash.
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Random => "random",
            Self::ByName => "byname",
            Self::ByFilters => "byfilters",
            Self::History => "history",
            Self::Cancel => "cancel",
        }
    }

    /// Short description shown in the platform's command list.
    pub fn description(self) -> &'static str {
        match self {
            Self::Start => "Запустить бота",
            Self::Help => "Вывести справку",
            Self::Random => "Вывести случайный фильм",
            Self::ByName => "Поиск фильма по названию",
            Self::ByFilters => "Поиск фильма с фильтрами",
            Self::History => "История поисковых запросов",
            Self::Cancel => "Прервать текущий поиск",
        }
    }

    /// Parse the first word of a message such as `/byname` or
    /// `/byname@some_bot`. Anything that is not a known command is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.name().eq_ignore_ascii_case(name))
    }
}

/// Who sent an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: UserId,
    pub first_name: String,
    pub full_name: String,
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundKind {
    Command(Command),
    Text(String),
    /// A menu button press. `origin` is the message carrying the menu.
    Callback {
        callback_id: String,
        origin: Option<MessageId>,
        data: String,
    },
}

/// One user event, handled to completion before the next one from the
/// same user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub sender: Sender,
    pub chat_id: ChatId,
    pub kind: InboundKind,
}
