//! HTTP front door and process wiring for the bridge.
//!
//! `server` serves the LINE webhook and health routes; `bootstrap` builds
//! every component from a validated config and runs them together.

pub mod bootstrap;
pub mod server;
pub mod state;

pub use {
    bootstrap::run,
    server::{build_app, serve},
    state::AppState,
};
