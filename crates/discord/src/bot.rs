//! Discord bot session lifecycle.

use std::sync::Arc;

use {
    bridge_relay::RelayCoordinator,
    secrecy::{ExposeSecret, Secret},
    serenity::all::{Client, Http, UserId},
    tokio::task::JoinHandle,
    tracing::{info, warn},
};

use crate::{BridgeHandler, DiscordOutbound, Error, Result};

/// Parse the operator's Discord user id (a non-zero snowflake).
pub fn parse_operator_id(raw: &str) -> Result<UserId> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id != 0 => Ok(UserId::new(id)),
        _ => Err(Error::InvalidOperator(raw.to_string())),
    }
}

/// An authenticated bot session that has not started listening yet.
pub struct DiscordSession {
    token: Secret<String>,
    http: Arc<Http>,
    operator: UserId,
}

impl DiscordSession {
    /// Authenticate the bot token against the REST API.
    pub async fn connect(token: Secret<String>, operator: UserId) -> Result<Self> {
        if token.expose_secret().trim().is_empty() {
            return Err(Error::MissingToken);
        }
        let http = Arc::new(Http::new(token.expose_secret()));
        let me = http
            .get_current_user()
            .await
            .map_err(|e| Error::serenity("authenticate bot token", e))?;
        info!(bot_name = %me.name, bot_id = %me.id, "discord session authenticated");

        Ok(Self {
            token,
            http,
            operator,
        })
    }

    /// Outbound adapter sharing this session's REST client.
    pub fn outbound(&self) -> DiscordOutbound {
        DiscordOutbound::new(Arc::clone(&self.http), self.operator)
    }

    /// Open the gateway connection and dispatch operator DMs to `coordinator`.
    ///
    /// The returned task resolves only when the gateway connection ends.
    pub async fn start(
        self,
        coordinator: Arc<RelayCoordinator>,
    ) -> Result<JoinHandle<Result<()>>> {
        let handler = BridgeHandler::new(self.operator, coordinator);
        let mut client = Client::builder(self.token.expose_secret(), BridgeHandler::intents())
            .event_handler(handler)
            .await
            .map_err(|e| Error::serenity("build client", e))?;

        Ok(tokio::spawn(async move {
            let result = client.start().await;
            if let Err(e) = &result {
                warn!(error = %e, "discord gateway stopped");
            }
            result.map_err(|e| Error::serenity("gateway connection", e))
        }))
    }
}
