use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, trace, warn},
};

use crate::{ReasoningProvider, shared_http_client};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Google Gemini `generateContent` client constrained to JSON output.
pub struct GeminiProvider {
    api_key: Secret<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: Secret<String>, model: String, base_url: String) -> anyhow::Result<Self> {
        if api_key.expose_secret().trim().is_empty() {
            anyhow::bail!("gemini api key is empty");
        }
        if model.trim().is_empty() {
            anyhow::bail!("gemini model is empty");
        }
        Ok(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: shared_http_client().clone(),
        })
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
            },
        })
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(resp: &serde_json::Value) -> Option<String> {
    let parts = resp["candidates"][0]["content"]["parts"].as_array()?;
    let texts: Vec<&str> = parts.iter().filter_map(|part| part["text"].as_str()).collect();
    let joined = texts.join("");
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[async_trait]
impl ReasoningProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn id(&self) -> &str {
        &self.model
    }

    async fn complete_json(&self, prompt: &str) -> anyhow::Result<String> {
        let body = Self::request_body(prompt);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        debug!(model = %self.model, prompt_len = prompt.len(), "gemini complete request");

        let http_resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_resp.status();
        if !status.is_success() {
            let body_text = http_resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body_text, "gemini API error");
            anyhow::bail!("Gemini API error HTTP {status}: {body_text}");
        }

        let resp = http_resp.json::<serde_json::Value>().await?;
        trace!(response = %resp, "gemini raw response");

        extract_text(&resp).ok_or_else(|| anyhow::anyhow!("no content generated"))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: String) -> GeminiProvider {
        GeminiProvider::new(
            Secret::new("test-key".into()),
            DEFAULT_MODEL.into(),
            base_url,
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_api_key() {
        let result = GeminiProvider::new(
            Secret::new("  ".into()),
            DEFAULT_MODEL.into(),
            DEFAULT_BASE_URL.into(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn name_and_id() {
        let p = provider("https://example.com/".into());
        assert_eq!(p.name(), "gemini");
        assert_eq!(p.id(), DEFAULT_MODEL);
        assert_eq!(p.base_url, "https://example.com");
    }

    #[test]
    fn request_body_asks_for_json() {
        let body = GeminiProvider::request_body("hello");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn extract_text_joins_parts() {
        let resp = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] }
            }]
        });
        assert_eq!(extract_text(&resp).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn extract_text_none_without_candidates() {
        assert!(extract_text(&serde_json::json!({ "candidates": [] })).is_none());
        let no_text = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": {} }] } }]
        });
        assert!(extract_text(&no_text).is_none());
    }

    #[tokio::test]
    async fn complete_json_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                format!("/v1beta/models/{DEFAULT_MODEL}:generateContent").as_str(),
            )
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "{\"should_advise\":false}" }] }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = provider(server.url()).complete_json("prompt").await.unwrap();
        assert_eq!(text, "{\"should_advise\":false}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn complete_json_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock(
                "POST",
                format!("/v1beta/models/{DEFAULT_MODEL}:generateContent").as_str(),
            )
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let err = provider(server.url())
            .complete_json("prompt")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn complete_json_errors_on_empty_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock(
                "POST",
                format!("/v1beta/models/{DEFAULT_MODEL}:generateContent").as_str(),
            )
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = provider(server.url())
            .complete_json("prompt")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no content generated");
    }
}
