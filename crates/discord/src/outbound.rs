use std::sync::Arc;

use {
    async_trait::async_trait,
    bridge_channels::{ChannelType, Error as ChannelError, OperatorOutbound},
    serenity::all::{ChannelId, Http, UserId},
    tokio::sync::Mutex,
    tracing::debug,
};

use crate::{DISCORD_MAX_MESSAGE_LEN, chunk::chunk_message};

/// Prefix that marks a message as advice rather than a relayed message.
pub const ADVICE_MARKER: &str = "💡 ";

/// Delivers to the operator's DM channel.
pub struct DiscordOutbound {
    http: Arc<Http>,
    operator: UserId,
    dm_channel: Mutex<Option<ChannelId>>,
}

impl DiscordOutbound {
    pub fn new(http: Arc<Http>, operator: UserId) -> Self {
        Self {
            http,
            operator,
            dm_channel: Mutex::new(None),
        }
    }

    /// Open the DM channel once and reuse it afterwards.
    async fn dm_channel(&self) -> bridge_channels::Result<ChannelId> {
        let mut cached = self.dm_channel.lock().await;
        if let Some(id) = *cached {
            return Ok(id);
        }
        let channel = self
            .operator
            .create_dm_channel(&self.http)
            .await
            .map_err(|e| ChannelError::external("open operator DM channel", e))?;
        debug!(channel = %channel.id, operator = %self.operator, "opened operator DM channel");
        *cached = Some(channel.id);
        Ok(channel.id)
    }

    async fn send(&self, text: &str) -> bridge_channels::Result<()> {
        if text.trim().is_empty() {
            return Err(ChannelError::invalid_input("refusing to send an empty message"));
        }
        let channel = self.dm_channel().await?;
        for chunk in chunk_message(text, DISCORD_MAX_MESSAGE_LEN) {
            channel
                .say(&self.http, chunk)
                .await
                .map_err(|e| ChannelError::external("send operator DM", e))?;
        }
        Ok(())
    }
}

/// Render advice so the operator can tell it apart from relayed messages.
pub fn format_advice(advice: &str) -> String {
    format!("{ADVICE_MARKER}{}", advice.trim())
}

#[async_trait]
impl OperatorOutbound for DiscordOutbound {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Discord
    }

    async fn send_text(&self, text: &str) -> bridge_channels::Result<()> {
        self.send(text).await
    }

    async fn send_advice(&self, advice: &str) -> bridge_channels::Result<()> {
        if advice.trim().is_empty() {
            return Err(ChannelError::invalid_input("refusing to send empty advice"));
        }
        self.send(&format_advice(advice)).await
    }
}
