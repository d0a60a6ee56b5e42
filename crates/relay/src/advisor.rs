//! Advisory step: asks a reasoning provider whether the operator could use
//! a hint about how to answer, based on the recent transcript.

use std::{sync::Arc, time::Duration};

use {
    bridge_providers::ReasoningProvider,
    serde::Deserialize,
    tracing::{debug, trace},
};

use crate::transcript::TranscriptEntry;

/// Upper bound for a single provider round-trip when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const PROMPT_HEADER: &str = "\
You sit between two chat channels and help one person keep the conversation going.
The \"correspondent\" is an end user on a messaging app. The \"operator\" reads and answers
those messages through a bot.

Read the conversation history below. Focus on the operator's reply to the correspondent's
most recent message and give advice to the operator only. Never write advice for the
correspondent.

Only advise when it genuinely helps. Greetings, small talk, and plain acknowledgements
need no advice, and neither does a conversation that is flowing smoothly. Advise when the
conversation stalls, when a misunderstanding looks likely, or when there is a clearly
better way to say something. Keep it casual, short, and actionable.";

const PROMPT_FOOTER: &str = r#"Answer with JSON in exactly this shape:
{
  "should_advise": boolean,
  "advice_for_operator": "string (advice about the operator's reply)",
  "advice_for_correspondent": ""
}"#;

/// Outcome of a successful provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryResult {
    pub should_advise: bool,
    pub advice_text: String,
}

impl AdvisoryResult {
    pub fn no_advice() -> Self {
        Self {
            should_advise: false,
            advice_text: String::new(),
        }
    }

    /// Advice text to surface, if any.
    pub fn advice(&self) -> Option<&str> {
        self.should_advise.then_some(self.advice_text.as_str())
    }
}

/// Why no advisory decision could be produced.
///
/// Distinct from a successful `should_advise = false`, so callers can tell
/// "the provider said nothing useful" from "the provider never answered".
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory call timed out after {0:?}")]
    Timeout(Duration),

    #[error("reasoning provider failed: {0}")]
    Provider(#[source] anyhow::Error),

    #[error("reasoning provider returned an empty response")]
    EmptyResponse,

    #[error("unparseable advisory response: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct AdviceResponse {
    #[serde(default)]
    should_advise: bool,
    #[serde(default)]
    advice_for_operator: String,
}

/// Runs the advisory prompt against a [`ReasoningProvider`] under a hard
/// timeout.
#[derive(Clone)]
pub struct Advisor {
    provider: Arc<dyn ReasoningProvider>,
    timeout: Duration,
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("provider", &self.provider.name())
            .field("model", &self.provider.id())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Advisor {
    pub fn new(provider: Arc<dyn ReasoningProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn analyze(
        &self,
        transcript: &[TranscriptEntry],
    ) -> Result<AdvisoryResult, AdvisoryError> {
        let prompt = build_prompt(transcript)?;
        trace!(prompt = %prompt, "advisory prompt");

        let raw = tokio::time::timeout(self.timeout, self.provider.complete_json(&prompt))
            .await
            .map_err(|_| AdvisoryError::Timeout(self.timeout))?
            .map_err(AdvisoryError::Provider)?;

        let result = parse_response(&raw)?;
        debug!(
            provider = self.provider.name(),
            should_advise = result.should_advise,
            entries = transcript.len(),
            "advisory analyzed"
        );
        Ok(result)
    }
}

fn build_prompt(transcript: &[TranscriptEntry]) -> Result<String, AdvisoryError> {
    let history = serde_json::to_string(transcript).map_err(AdvisoryError::Malformed)?;
    Ok(format!(
        "{PROMPT_HEADER}\n\nConversation history:\n{history}\n\n{PROMPT_FOOTER}\n"
    ))
}

/// Strip an optional ```json fence some models wrap around their output.
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_response(raw: &str) -> Result<AdvisoryResult, AdvisoryError> {
    let body = strip_fence(raw);
    if body.is_empty() {
        return Err(AdvisoryError::EmptyResponse);
    }
    let resp: AdviceResponse = serde_json::from_str(body).map_err(AdvisoryError::Malformed)?;
    let advice_text = resp.advice_for_operator.trim().to_string();

    // A "yes" with nothing to say is treated as no advice.
    Ok(AdvisoryResult {
        should_advise: resp.should_advise && !advice_text.is_empty(),
        advice_text,
    })
}
