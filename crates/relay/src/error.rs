use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transcript capacity must be at least 1")]
    ZeroCapacity,
}

pub type Result<T> = std::result::Result<T, Error>;
