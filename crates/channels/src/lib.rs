//! Outbound delivery seams for the two sides of the bridge.
//!
//! Each platform adapter implements one of the outbound traits; the relay
//! core only ever talks to these traits, never to a platform SDK.

pub mod error;
pub mod plugin;

pub use {
    error::{Error, Result},
    plugin::{ChannelType, CorrespondentOutbound, OperatorOutbound},
};
