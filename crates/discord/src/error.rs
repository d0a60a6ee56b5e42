pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid operator user id {0:?}")]
    InvalidOperator(String),

    #[error("discord bot token is empty")]
    MissingToken,

    #[error("discord {context}: {source}")]
    Serenity {
        context: &'static str,
        #[source]
        source: Box<serenity::Error>,
    },
}

impl Error {
    #[must_use]
    pub fn serenity(context: &'static str, source: serenity::Error) -> Self {
        Self::Serenity {
            context,
            source: Box::new(source),
        }
    }
}
