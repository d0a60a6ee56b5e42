use {
    async_trait::async_trait,
    bridge_channels::{ChannelType, CorrespondentOutbound, Error as ChannelError},
    bridge_common::CorrespondentId,
    secrecy::{ExposeSecret, Secret},
    serde_json::json,
    tracing::debug,
};

use crate::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";

/// Push-message sender for a single LINE channel.
pub struct LineOutbound {
    http: reqwest::Client,
    access_token: Secret<String>,
    api_base_url: String,
}

impl LineOutbound {
    pub fn new(access_token: Secret<String>, api_base_url: impl Into<String>) -> Result<Self> {
        if access_token.expose_secret().trim().is_empty() {
            return Err(Error::config("channel access token is empty"));
        }
        let api_base_url = api_base_url.into();
        let api_base_url = match api_base_url.trim().trim_end_matches('/') {
            "" => DEFAULT_API_BASE_URL.to_string(),
            url => url.to_string(),
        };
        Ok(Self {
            http: reqwest::Client::new(),
            access_token,
            api_base_url,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn push_url(&self) -> String {
        format!("{}/v2/bot/message/push", self.api_base_url)
    }
}

#[async_trait]
impl CorrespondentOutbound for LineOutbound {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Line
    }

    async fn send_text(&self, to: &CorrespondentId, text: &str) -> bridge_channels::Result<()> {
        let body = json!({
            "to": to.as_str(),
            "messages": [{ "type": "text", "text": text }],
        });

        let resp = self
            .http
            .post(self.push_url())
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::external("LINE push request", e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChannelError::rejected(
                ChannelType::Line.as_str(),
                status.as_u16(),
                body,
            ));
        }

        debug!(to = %to, "LINE push delivered");
        Ok(())
    }
}
