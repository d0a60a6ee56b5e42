use std::sync::Arc;

use {bridge_relay::RelayCoordinator, secrecy::Secret};

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RelayCoordinator>,
    /// LINE channel secret used to verify webhook signatures.
    pub channel_secret: Secret<String>,
}

impl AppState {
    pub fn new(coordinator: Arc<RelayCoordinator>, channel_secret: Secret<String>) -> Self {
        Self {
            coordinator,
            channel_secret,
        }
    }
}
