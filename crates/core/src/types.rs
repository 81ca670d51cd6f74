/// Primary keys of the search log tables (SQLite `INTEGER PRIMARY KEY`).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Chat-platform identity of a user.
pub type UserId = i64;

/// Chat-platform identity of a conversation.
pub type ChatId = i64;

/// Identifier of a message inside a chat.
pub type MessageId = i64;
