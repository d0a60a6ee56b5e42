//! Discord event handler for serenity.
//!
//! Turns direct messages from the operator into relay events.

use std::sync::{Arc, RwLock};

use {
    bridge_common::RelayEvent,
    bridge_relay::RelayCoordinator,
    serenity::{
        all::{Context, EventHandler, GatewayIntents, Message, Ready, UserId},
        async_trait,
    },
    tracing::{debug, info},
};

/// Why an inbound Discord message was not relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Bot,
    SelfAuthored,
    NotDirect,
    NotOperator,
    Empty,
}

/// The parts of a Discord message the relay cares about.
#[derive(Debug, Clone, Copy)]
pub struct Inbound<'a> {
    pub author: UserId,
    pub author_is_bot: bool,
    pub in_guild: bool,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for Inbound<'a> {
    fn from(msg: &'a Message) -> Self {
        Self {
            author: msg.author.id,
            author_is_bot: msg.author.bot,
            in_guild: msg.guild_id.is_some(),
            content: &msg.content,
        }
    }
}

/// Decide whether a message is an operator reply that should be relayed.
pub fn screen<'a>(
    inbound: Inbound<'a>,
    operator: UserId,
    bot_user: Option<UserId>,
) -> Result<&'a str, DropReason> {
    if bot_user == Some(inbound.author) {
        return Err(DropReason::SelfAuthored);
    }
    if inbound.author_is_bot {
        return Err(DropReason::Bot);
    }
    if inbound.in_guild {
        return Err(DropReason::NotDirect);
    }
    if inbound.author != operator {
        return Err(DropReason::NotOperator);
    }
    if inbound.content.trim().is_empty() {
        return Err(DropReason::Empty);
    }
    Ok(inbound.content)
}

/// Handler for Discord gateway events.
pub struct BridgeHandler {
    operator: UserId,
    bot_user_id: RwLock<Option<UserId>>,
    coordinator: Arc<RelayCoordinator>,
}

impl BridgeHandler {
    pub fn new(operator: UserId, coordinator: Arc<RelayCoordinator>) -> Self {
        Self {
            operator,
            bot_user_id: RwLock::new(None),
            coordinator,
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    fn bot_user_id(&self) -> Option<UserId> {
        *self.bot_user_id.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl EventHandler for BridgeHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            bot_id = %ready.user.id,
            operator = %self.operator,
            "discord bot ready"
        );
        *self.bot_user_id.write().unwrap_or_else(|e| e.into_inner()) = Some(ready.user.id);
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        let text = match screen(Inbound::from(&msg), self.operator, self.bot_user_id()) {
            Ok(text) => text,
            Err(reason) => {
                debug!(
                    author = %msg.author.id,
                    channel = %msg.channel_id,
                    ?reason,
                    "ignoring discord message"
                );
                return;
            },
        };

        debug!(channel = %msg.channel_id, "relaying operator message");
        // Gateway events keep flowing while the relay runs.
        drop(self.coordinator.spawn_relay(RelayEvent::from_operator(text)));
    }
}
