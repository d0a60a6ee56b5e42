//! LINE webhook handling.

use {
    base64::{Engine, engine::general_purpose::STANDARD},
    bridge_common::RelayEvent,
    hmac::{Hmac, Mac},
    serde::Deserialize,
    sha2::Sha256,
    tracing::{debug, warn},
};

use crate::Result;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verify a webhook signature against the channel secret.
///
/// The header value is the base64 encoding of HMAC-SHA256(body) keyed with
/// the channel secret. Comparison is constant-time.
pub fn verify_signature(body: &[u8], signature_header: &str, channel_secret: &str) -> bool {
    let signature_header = signature_header.trim();
    if signature_header.is_empty() {
        return false;
    }
    let Ok(expected) = STANDARD.decode(signature_header) else {
        warn!("signature header is not valid base64");
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("failed to create HMAC");
            return false;
        },
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Top-level callback body posted by the LINE platform.
#[derive(Debug, Deserialize)]
pub struct CallbackPayload {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
    #[serde(default)]
    pub reply_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookEvent {
    /// The relayable form of this event, if it is a text message from a user.
    fn into_relay_event(self) -> Option<RelayEvent> {
        if self.event_type != "message" {
            debug!(event_type = %self.event_type, "ignoring non-message event");
            return None;
        }

        let message = self.message?;
        if message.message_type != "text" {
            debug!(message_type = %message.message_type, "ignoring non-text message");
            return None;
        }

        let source = self.source?;
        if source.source_type != "user" {
            debug!(source_type = %source.source_type, "ignoring message from non-user source");
            return None;
        }

        let user_id = source.user_id.unwrap_or_default();
        let text = message.text.unwrap_or_default();
        match RelayEvent::from_correspondent(&user_id, text) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!(error = %e, "ignoring message without sender");
                None
            },
        }
    }
}

/// Decode a verified webhook body into relay events.
///
/// Only text messages sent by a user are kept. A body that is not a callback
/// payload is an error and nothing from it is relayed.
pub fn parse_events(body: &[u8]) -> Result<Vec<RelayEvent>> {
    let payload: CallbackPayload = serde_json::from_slice(body)?;
    debug!(
        destination = %payload.destination,
        count = payload.events.len(),
        "received LINE webhook"
    );
    Ok(payload
        .events
        .into_iter()
        .filter_map(WebhookEvent::into_relay_event)
        .collect())
}
