use std::fmt;

use {async_trait::async_trait, bridge_common::CorrespondentId, serde::Serialize};

use crate::Result;

/// Messaging platforms the bridge knows how to deliver to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Line,
    Discord,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Discord => "discord",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deliver text to a specific correspondent.
#[async_trait]
pub trait CorrespondentOutbound: Send + Sync {
    fn channel_type(&self) -> ChannelType;

    async fn send_text(&self, to: &CorrespondentId, text: &str) -> Result<()>;
}

/// Deliver text to the single configured operator.
///
/// Relayed messages and advice are separate calls so an adapter can render
/// them differently; they are never merged into one message.
#[async_trait]
pub trait OperatorOutbound: Send + Sync {
    fn channel_type(&self) -> ChannelType;

    async fn send_text(&self, text: &str) -> Result<()>;

    async fn send_advice(&self, advice: &str) -> Result<()>;
}
