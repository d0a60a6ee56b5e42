//! Reasoning providers used by the advisory step.
//!
//! A provider is a plain text-in / JSON-text-out completion capability. The
//! caller owns prompt construction and response parsing.

pub mod gemini;

use async_trait::async_trait;

pub use gemini::GeminiProvider;

/// Shared HTTP client for providers.
///
/// Providers that don't need custom redirect/proxy settings reuse this
/// client to share connection pools and TLS sessions.
pub fn shared_http_client() -> &'static reqwest::Client {
    static CLIENT: std::sync::LazyLock<reqwest::Client> =
        std::sync::LazyLock::new(reqwest::Client::new);
    &CLIENT
}

/// A completion backend that answers with a JSON document.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Model identifier used for requests.
    fn id(&self) -> &str;

    /// Submit `prompt` and return the raw JSON text of the answer.
    async fn complete_json(&self, prompt: &str) -> anyhow::Result<String>;
}
