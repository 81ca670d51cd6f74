#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown command kind '{0}'")]
    UnknownCommand(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
