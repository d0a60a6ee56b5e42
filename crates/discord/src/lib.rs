//! Discord adapter: the operator's side of the bridge.
//!
//! The bot only listens to direct messages from the configured operator and
//! only ever writes into that operator's DM channel.

pub mod bot;
pub mod chunk;
pub mod error;
pub mod handler;
pub mod outbound;

pub use {
    bot::{DiscordSession, parse_operator_id},
    error::{Error, Result},
    handler::BridgeHandler,
    outbound::{ADVICE_MARKER, DiscordOutbound},
};

/// Maximum message length accepted by Discord, in characters.
pub const DISCORD_MAX_MESSAGE_LEN: usize = 2000;
