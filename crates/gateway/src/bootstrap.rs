//! Assemble the bridge from a validated config and run it.

use std::{sync::Arc, time::Duration};

use {
    anyhow::Context,
    bridge_config::{AdvisorConfig, BridgeConfig},
    bridge_discord::{DiscordSession, parse_operator_id},
    bridge_line::LineOutbound,
    bridge_providers::gemini::GeminiProvider,
    bridge_relay::{Advisor, CorrelationState, RelayCoordinator, TranscriptBuffer},
    tokio::net::TcpListener,
    tracing::{info, warn},
};

use crate::{
    server::{build_app, serve},
    state::AppState,
};

/// Build the advisory step, or `None` when it is not configured or the
/// provider cannot be constructed.
pub fn build_advisor(config: &AdvisorConfig) -> Option<Advisor> {
    if !config.is_enabled() {
        info!("advisory step disabled (no Gemini API key)");
        return None;
    }
    let key = config.gemini_api_key.clone()?;
    match GeminiProvider::new(key, config.model.clone(), config.base_url.clone()) {
        Ok(provider) => {
            info!(model = %config.model, timeout_secs = config.timeout_secs, "advisory step enabled");
            Some(
                Advisor::new(Arc::new(provider))
                    .with_timeout(Duration::from_secs(config.timeout_secs)),
            )
        },
        Err(e) => {
            warn!(error = %e, "failed to build Gemini provider, advisory step disabled");
            None
        },
    }
}

/// Start every component and block until the HTTP server or the Discord
/// client stops.
pub async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    let channel_secret = config
        .line
        .channel_secret
        .clone()
        .context("line.channel_secret is required")?;
    let access_token = config
        .line
        .channel_access_token
        .clone()
        .context("line.channel_access_token is required")?;
    let line_out = LineOutbound::new(access_token, config.line.api_base_url.clone())?;

    let operator = parse_operator_id(
        config
            .discord
            .operator_user_id
            .as_deref()
            .context("discord.operator_user_id is required")?,
    )?;
    let bot_token = config
        .discord
        .bot_token
        .clone()
        .context("discord.bot_token is required")?;
    let session = DiscordSession::connect(bot_token, operator)
        .await
        .context("failed to start Discord session")?;
    let discord_out = session.outbound();

    let transcript = TranscriptBuffer::new(config.relay.transcript_capacity)?;
    let mut coordinator = RelayCoordinator::new(
        Arc::new(CorrelationState::new()),
        Arc::new(transcript),
        Arc::new(line_out),
        Arc::new(discord_out),
    );
    if let Some(advisor) = build_advisor(&config.advisor) {
        coordinator = coordinator.with_advisor(advisor);
    }
    let coordinator = Arc::new(coordinator);

    let discord = session
        .start(Arc::clone(&coordinator))
        .await
        .context("failed to open Discord gateway")?;

    let addr = config.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let app = build_app(AppState::new(coordinator, channel_secret));

    tokio::select! {
        result = serve(listener, app) => result.context("http server stopped"),
        result = discord => match result {
            Ok(Ok(())) => {
                info!("discord client stopped");
                Ok(())
            },
            Ok(Err(e)) => Err(e).context("discord client stopped"),
            Err(e) => Err(e).context("discord client task failed"),
        },
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::Secret};

    #[test]
    fn advisor_disabled_without_key() {
        assert!(build_advisor(&AdvisorConfig::default()).is_none());
    }

    #[test]
    fn advisor_uses_configured_timeout() {
        let config = AdvisorConfig {
            gemini_api_key: Some(Secret::new("key".into())),
            timeout_secs: 3,
            ..Default::default()
        };
        let advisor = build_advisor(&config).unwrap();
        assert_eq!(advisor.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn provider_failure_disables_advisor() {
        let config = AdvisorConfig {
            gemini_api_key: Some(Secret::new("key".into())),
            model: " ".into(),
            ..Default::default()
        };
        assert!(build_advisor(&config).is_none());
    }
}
