pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The webhook body is not a LINE callback payload.
    #[error("malformed webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid LINE configuration: {0}")]
    Config(String),
}

impl Error {
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
