//! Configuration loading, env substitution, env-var overrides, and
//! validation.
//!
//! Config files: `bridge.toml`, `bridge.yaml`, `bridge.yml`, or
//! `bridge.json`, searched in `./` then the user config directory.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in the raw
//! file before parsing.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, discover_and_load, load_config},
    schema::{AdvisorConfig, BridgeConfig, DiscordConfig, LineConfig, RelayConfig, ServerConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
