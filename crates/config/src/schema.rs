//! Config schema: HTTP server, the two channels, the advisor, and the relay.

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub server: ServerConfig,
    pub line: LineConfig,
    pub discord: DiscordConfig,
    pub advisor: AdvisorConfig,
    pub relay: RelayConfig,
}

/// HTTP server receiving LINE webhooks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0".
    pub bind: String,
    /// Port to listen on. Defaults to 8080.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// LINE Messaging API credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Channel secret used to verify `X-Line-Signature`.
    pub channel_secret: Option<Secret<String>>,
    /// Long-lived channel access token used for push messages.
    pub channel_access_token: Option<Secret<String>>,
    pub api_base_url: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: None,
            channel_access_token: None,
            api_base_url: "https://api.line.me".into(),
        }
    }
}

/// Discord bot session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub bot_token: Option<Secret<String>>,
    /// Snowflake of the only user whose DMs are relayed, and who receives
    /// relayed messages and advice.
    pub operator_user_id: Option<String>,
}

/// Gemini-backed advisory step. Disabled when no API key is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub gemini_api_key: Option<Secret<String>>,
    pub model: String,
    pub base_url: String,
    /// Hard upper bound for one advisory call.
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: "gemini-2.0-flash-lite".into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            timeout_secs: 5,
        }
    }
}

impl AdvisorConfig {
    pub fn is_enabled(&self) -> bool {
        has_value(&self.gemini_api_key)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Number of recent messages kept as advisory context.
    pub transcript_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            transcript_capacity: 20,
        }
    }
}

/// True when the secret is present and not blank.
pub(crate) fn has_value(secret: &Option<Secret<String>>) -> bool {
    secret
        .as_ref()
        .is_some_and(|s| !s.expose_secret().trim().is_empty())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.server.address(), "0.0.0.0:8080");
        assert_eq!(cfg.line.api_base_url, "https://api.line.me");
        assert_eq!(cfg.advisor.model, "gemini-2.0-flash-lite");
        assert_eq!(cfg.advisor.timeout_secs, 5);
        assert_eq!(cfg.relay.transcript_capacity, 20);
        assert!(!cfg.advisor.is_enabled());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: BridgeConfig = toml::from_str(
            r#"
            [server]
            port = 3000

            [discord]
            operator_user_id = "1234"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.discord.operator_user_id.as_deref(), Some("1234"));
        assert!(cfg.discord.bot_token.is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg: BridgeConfig = toml::from_str(
            r#"
            [line]
            channel_secret = "super-secret-value"
            "#,
        )
        .unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret-value"));
    }

    #[test]
    fn blank_key_does_not_enable_advisor() {
        let cfg = AdvisorConfig {
            gemini_api_key: Some(Secret::new("  ".into())),
            ..Default::default()
        };
        assert!(!cfg.is_enabled());
    }
}
