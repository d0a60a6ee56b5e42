use std::fmt;

use crate::{
    Error, Result,
    schema::{BridgeConfig, has_value},
};

/// Advisory timeouts above this many seconds get a warning.
const ADVISOR_TIMEOUT_WARN_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single finding about the config, keyed by its dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub path: &'static str,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    fn error(&mut self, path: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            path,
            message: message.into(),
        });
    }

    fn warning(&mut self, path: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            path,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Fail with every error at once so operators can fix them in one pass.
    pub fn into_result(self) -> Result<()> {
        let errors: Vec<String> = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(ToString::to_string)
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Invalid(errors))
        }
    }
}

/// Check that every credential needed to run both channels is present.
pub fn validate(config: &BridgeConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !has_value(&config.line.channel_secret) {
        result.error(
            "line.channel_secret",
            "required (or set LINE_CHANNEL_SECRET)",
        );
    }
    if !has_value(&config.line.channel_access_token) {
        result.error(
            "line.channel_access_token",
            "required (or set LINE_CHANNEL_ACCESS_TOKEN)",
        );
    }
    if !has_value(&config.discord.bot_token) {
        result.error("discord.bot_token", "required (or set DISCORD_BOT_TOKEN)");
    }
    match config.discord.operator_user_id.as_deref().map(str::trim) {
        None | Some("") => {
            result.error(
                "discord.operator_user_id",
                "required (or set DISCORD_USER_ID)",
            );
        },
        Some(id) if id.parse::<u64>().map_or(true, |n| n == 0) => {
            result.error(
                "discord.operator_user_id",
                format!("must be a Discord user id, got {id:?}"),
            );
        },
        Some(_) => {},
    }
    if config.relay.transcript_capacity == 0 {
        result.error("relay.transcript_capacity", "must be at least 1");
    }
    if config.server.port == 0 {
        result.error("server.port", "must be a fixed port");
    }

    if config.advisor.is_enabled() {
        if config.advisor.timeout_secs == 0 {
            result.error("advisor.timeout_secs", "must be at least 1");
        } else if config.advisor.timeout_secs > ADVISOR_TIMEOUT_WARN_SECS {
            result.warning(
                "advisor.timeout_secs",
                format!(
                    "{}s is long for an advisory call, keep it at a few seconds",
                    config.advisor.timeout_secs
                ),
            );
        }
        if config.advisor.model.trim().is_empty() {
            result.error("advisor.model", "must not be empty");
        }
    } else {
        result.warning(
            "advisor.gemini_api_key",
            "not set, advisory step disabled",
        );
    }

    result
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::Secret};

    fn complete() -> BridgeConfig {
        let mut cfg = BridgeConfig::default();
        cfg.line.channel_secret = Some(Secret::new("s".into()));
        cfg.line.channel_access_token = Some(Secret::new("t".into()));
        cfg.discord.bot_token = Some(Secret::new("d".into()));
        cfg.discord.operator_user_id = Some("123456789012345678".into());
        cfg
    }

    fn error_paths(result: &ValidationResult) -> Vec<&'static str> {
        result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.path)
            .collect()
    }

    #[test]
    fn default_config_lists_all_missing_credentials() {
        let result = validate(&BridgeConfig::default());
        assert_eq!(error_paths(&result), vec![
            "line.channel_secret",
            "line.channel_access_token",
            "discord.bot_token",
            "discord.operator_user_id",
        ]);
        let err = result.into_result().unwrap_err();
        assert!(err.to_string().contains("DISCORD_USER_ID"));
    }

    #[test]
    fn complete_config_passes_with_advisor_warning() {
        let result = validate(&complete());
        assert!(!result.has_errors());
        assert_eq!(result.warnings().count(), 1);
        result.into_result().unwrap();
    }

    #[test]
    fn operator_id_must_be_numeric() {
        let mut cfg = complete();
        cfg.discord.operator_user_id = Some("alice".into());
        assert_eq!(error_paths(&validate(&cfg)), vec!["discord.operator_user_id"]);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut cfg = complete();
        cfg.relay.transcript_capacity = 0;
        assert_eq!(error_paths(&validate(&cfg)), vec![
            "relay.transcript_capacity"
        ]);
    }

    #[test]
    fn advisor_settings_checked_only_when_enabled() {
        let mut cfg = complete();
        cfg.advisor.timeout_secs = 0;
        assert!(!validate(&cfg).has_errors());

        cfg.advisor.gemini_api_key = Some(Secret::new("k".into()));
        assert_eq!(error_paths(&validate(&cfg)), vec!["advisor.timeout_secs"]);
    }

    #[test]
    fn long_advisor_timeout_is_a_warning() {
        let mut cfg = complete();
        cfg.advisor.gemini_api_key = Some(Secret::new("k".into()));
        cfg.advisor.timeout_secs = 30;
        assert_eq!(validate(&cfg).warnings().count(), 0);

        cfg.advisor.timeout_secs = 120;
        let result = validate(&cfg);
        assert!(!result.has_errors());
        let paths: Vec<_> = result.warnings().map(|d| d.path).collect();
        assert_eq!(paths, ["advisor.timeout_secs"]);
    }
}
