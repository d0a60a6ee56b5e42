//! Shared types, error definitions, and helpers used across the bridge crates.

pub mod error;
pub mod types;

pub use {
    error::{Error, FromMessage, Result},
    types::{CorrespondentId, Origin, RelayEvent},
};
