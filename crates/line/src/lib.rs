//! LINE Messaging API adapter: webhook verification and parsing on the way
//! in, push messages on the way out.

pub mod error;
pub mod outbound;
pub mod webhook;

pub use {
    error::{Error, Result},
    outbound::LineOutbound,
    webhook::{SIGNATURE_HEADER, parse_events, verify_signature},
};
