use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    env_subst::substitute_env,
    error::{Context, Error, Result},
    schema::BridgeConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["bridge.toml", "bridge.yaml", "bridge.yml", "bridge.json"];

const APP_NAME: &str = "line-discord-bridge";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Load config from `explicit` if given, else from standard locations.
///
/// Search order without an explicit path:
/// 1. `./bridge.{toml,yaml,yml,json}`
/// 2. `<user config dir>/line-discord-bridge/bridge.{toml,yaml,yml,json}`
///
/// An explicit path must load. A discovered file that fails to parse is
/// logged and skipped, and no file at all yields defaults, so credentials can
/// come from the environment alone.
pub fn discover_and_load(explicit: Option<&Path>) -> Result<BridgeConfig> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return load_config(path);
    }

    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return Ok(cfg),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    Ok(BridgeConfig::default())
}

fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<BridgeConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}

/// Apply the process environment on top of a loaded config.
///
/// Recognized variables: `PORT`, `LINE_CHANNEL_SECRET`,
/// `LINE_CHANNEL_ACCESS_TOKEN`, `DISCORD_BOT_TOKEN`, `DISCORD_USER_ID`,
/// `GEMINI_API_KEY`, `GEMINI_MODEL`. Empty values are ignored.
pub fn apply_env_overrides(config: &mut BridgeConfig) -> Result<()> {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

fn apply_env_overrides_with(
    config: &mut BridgeConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("PORT must be a port number, got {port:?}"))?;
    }
    if let Some(v) = get("LINE_CHANNEL_SECRET") {
        config.line.channel_secret = Some(Secret::new(v));
    }
    if let Some(v) = get("LINE_CHANNEL_ACCESS_TOKEN") {
        config.line.channel_access_token = Some(Secret::new(v));
    }
    if let Some(v) = get("DISCORD_BOT_TOKEN") {
        config.discord.bot_token = Some(Secret::new(v));
    }
    if let Some(v) = get("DISCORD_USER_ID") {
        config.discord.operator_user_id = Some(v.trim().to_string());
    }
    if let Some(v) = get("GEMINI_API_KEY") {
        config.advisor.gemini_api_key = Some(Secret::new(v));
    }
    if let Some(v) = get("GEMINI_MODEL") {
        config.advisor.model = v.trim().to_string();
    }
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn loads_toml_with_env_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.toml");
        std::fs::write(
            &path,
            r#"
            [server]
            port = 9000

            [advisor]
            model = "${BRIDGE_TEST_UNSET_MODEL:-gemini-test}"
            "#,
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.advisor.model, "gemini-test");
    }

    #[test]
    fn loads_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("bridge.yaml");
        std::fs::write(&yaml, "relay:\n  transcript_capacity: 5\n").unwrap();
        assert_eq!(load_config(&yaml).unwrap().relay.transcript_capacity, 5);

        let json = dir.path().join("bridge.json");
        std::fs::write(&json, r#"{"discord":{"operator_user_id":"42"}}"#).unwrap();
        assert_eq!(
            load_config(&json).unwrap().discord.operator_user_id.as_deref(),
            Some("42")
        );
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.ini");
        std::fs::write(&path, "port=1").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(Error::UnsupportedFormat(ext)) if ext == "ini"
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            discover_and_load(Some(&missing)),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg = BridgeConfig::default();
        apply_env_overrides_with(
            &mut cfg,
            env(&[
                ("PORT", "8443"),
                ("LINE_CHANNEL_SECRET", "line-secret"),
                ("LINE_CHANNEL_ACCESS_TOKEN", "line-token"),
                ("DISCORD_BOT_TOKEN", "discord-token"),
                ("DISCORD_USER_ID", " 1234 "),
                ("GEMINI_API_KEY", "gemini-key"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.server.port, 8443);
        assert_eq!(
            cfg.line.channel_secret.as_ref().unwrap().expose_secret(),
            "line-secret"
        );
        assert_eq!(
            cfg.line.channel_access_token.as_ref().unwrap().expose_secret(),
            "line-token"
        );
        assert_eq!(
            cfg.discord.bot_token.as_ref().unwrap().expose_secret(),
            "discord-token"
        );
        assert_eq!(cfg.discord.operator_user_id.as_deref(), Some("1234"));
        assert!(cfg.advisor.is_enabled());
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = BridgeConfig::default();
        apply_env_overrides_with(&mut cfg, env(&[("PORT", ""), ("GEMINI_API_KEY", "")])).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert!(!cfg.advisor.is_enabled());
    }

    #[test]
    fn bad_port_is_an_error() {
        let mut cfg = BridgeConfig::default();
        let err = apply_env_overrides_with(&mut cfg, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT must be a port number"));
    }
}
