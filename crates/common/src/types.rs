use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which side of the bridge a message entered from.
///
/// `Correspondent` is the webhook-style platform whose end users are
/// identified per message. `Operator` is the bot-session platform with a
/// single fixed human on the other end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Correspondent,
    Operator,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correspondent => "correspondent",
            Self::Operator => "operator",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque identity of a remote party on the correspondent side.
///
/// Never empty: construction trims and rejects blank input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CorrespondentId(String);

impl CorrespondentId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.len() == id.len() {
            Some(Self(id))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrespondentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CorrespondentId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value).ok_or_else(|| Error::invalid_event("empty correspondent id"))
    }
}

impl From<CorrespondentId> for String {
    fn from(id: CorrespondentId) -> Self {
        id.0
    }
}

/// A normalized inbound message, produced by an ingress adapter after it
/// has verified and filtered the raw platform event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// A correspondent wrote in; relay to the operator.
    FromCorrespondent {
        correspondent: CorrespondentId,
        text: String,
    },
    /// The operator replied; relay to the last known correspondent.
    FromOperator { text: String },
}

impl RelayEvent {
    /// Build a correspondent-side event. Fails when `correspondent` is blank.
    pub fn from_correspondent(correspondent: &str, text: impl Into<String>) -> Result<Self> {
        let correspondent = CorrespondentId::new(correspondent)
            .ok_or_else(|| Error::invalid_event("correspondent id is required"))?;
        Ok(Self::FromCorrespondent {
            correspondent,
            text: text.into(),
        })
    }

    pub fn from_operator(text: impl Into<String>) -> Self {
        Self::FromOperator { text: text.into() }
    }

    pub fn origin(&self) -> Origin {
        match self {
            Self::FromCorrespondent { .. } => Origin::Correspondent,
            Self::FromOperator { .. } => Origin::Operator,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::FromCorrespondent { text, .. } | Self::FromOperator { text } => text,
        }
    }

    pub fn correspondent(&self) -> Option<&CorrespondentId> {
        match self {
            Self::FromCorrespondent { correspondent, .. } => Some(correspondent),
            Self::FromOperator { .. } => None,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correspondent_id_rejects_blank() {
        assert!(CorrespondentId::new("").is_none());
        assert!(CorrespondentId::new("   ").is_none());
    }

    #[test]
    fn correspondent_id_trims() {
        let id = CorrespondentId::new(" U123 ").unwrap();
        assert_eq!(id.as_str(), "U123");
    }

    #[test]
    fn correspondent_event_requires_id() {
        let err = RelayEvent::from_correspondent("", "hello").unwrap_err();
        assert!(matches!(err, Error::InvalidEvent { .. }));
    }

    #[test]
    fn event_accessors() {
        let a = RelayEvent::from_correspondent("U1", "hello").unwrap();
        assert_eq!(a.origin(), Origin::Correspondent);
        assert_eq!(a.text(), "hello");
        assert_eq!(a.correspondent().map(CorrespondentId::as_str), Some("U1"));

        let b = RelayEvent::from_operator("hi back");
        assert_eq!(b.origin(), Origin::Operator);
        assert_eq!(b.text(), "hi back");
        assert!(b.correspondent().is_none());
    }

    #[test]
    fn origin_serde() {
        assert_eq!(
            serde_json::to_string(&Origin::Correspondent).unwrap(),
            "\"correspondent\""
        );
    }

    #[test]
    fn correspondent_id_serde_rejects_empty() {
        let ok: CorrespondentId = serde_json::from_str("\"U9\"").unwrap();
        assert_eq!(ok.as_str(), "U9");
        assert!(serde_json::from_str::<CorrespondentId>("\"\"").is_err());
    }
}
