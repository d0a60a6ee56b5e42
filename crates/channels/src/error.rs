use std::error::Error as StdError;

/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed delivery errors shared across the outbound traits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input payload or parameter is invalid.
    #[error("invalid channel input: {message}")]
    InvalidInput { message: String },

    /// The channel is not connected or not configured yet.
    #[error("channel unavailable: {message}")]
    Unavailable { message: String },

    /// The remote platform answered with a non-success status.
    #[error("{channel} rejected the message ({status}): {body}")]
    Rejected {
        channel: &'static str,
        status: u16,
        body: String,
    },

    /// Wrapped source error from a transport or SDK.
    #[error("channel operation failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_input(message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn rejected(channel: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            channel,
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_includes_status_and_body() {
        let err = Error::rejected("line", 429, "rate limited");
        assert_eq!(err.to_string(), "line rejected the message (429): rate limited");
    }

    #[test]
    fn external_keeps_source() {
        let io = std::io::Error::other("socket closed");
        let err = Error::external("push message", io);
        assert!(StdError::source(&err).is_some());
        assert!(err.to_string().contains("push message: socket closed"));
    }
}
