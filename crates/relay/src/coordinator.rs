use std::sync::Arc;

use {
    bridge_channels::{CorrespondentOutbound, OperatorOutbound},
    bridge_common::{CorrespondentId, Origin, RelayEvent},
    tokio::task::JoinHandle,
    tracing::{debug, info, warn},
};

use crate::{
    advisor::{AdvisoryError, AdvisoryResult, Advisor},
    correlation::CorrelationState,
    transcript::{TranscriptBuffer, TranscriptEntry},
};

// ── Delivery instructions ───────────────────────────────────────────────────

/// An outbound instruction handed to one of the send adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Relay correspondent text to the operator.
    ToOperator { text: String },
    /// Relay operator text to the correlated correspondent.
    ToCorrespondent {
        correspondent: CorrespondentId,
        text: String,
    },
    /// Advice for the operator; never sent to the correspondent side.
    AdviceToOperator { text: String },
}

impl Delivery {
    pub fn text(&self) -> &str {
        match self {
            Self::ToOperator { text }
            | Self::ToCorrespondent { text, .. }
            | Self::AdviceToOperator { text } => text,
        }
    }

    /// Side of the bridge the instruction is delivered to.
    pub fn target(&self) -> Origin {
        match self {
            Self::ToCorrespondent { .. } => Origin::Correspondent,
            Self::ToOperator { .. } | Self::AdviceToOperator { .. } => Origin::Operator,
        }
    }
}

/// A delivery together with what the send adapter answered.
#[derive(Debug)]
pub struct DeliveryReport {
    pub delivery: Delivery,
    pub result: bridge_channels::Result<()>,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

/// What happened on the advisory side of a relay.
#[derive(Debug)]
pub enum AdvisoryOutcome {
    /// Correspondent-originated events never get advice.
    NotRequested,
    /// No advisor is configured.
    Disabled,
    /// The provider answered and saw nothing worth saying.
    NoAdvice,
    /// The provider failed or timed out; nothing was sent.
    Failed(AdvisoryError),
    /// Advice was produced and handed to the operator adapter.
    Advised(DeliveryReport),
}

/// Result of running one inbound event through the coordinator.
#[derive(Debug)]
pub enum RelayOutcome {
    Relayed {
        relay: DeliveryReport,
        advisory: AdvisoryOutcome,
    },
    /// An operator message arrived before any correspondent was known.
    NoDestination,
}

impl RelayOutcome {
    /// The relay instruction, if one was produced.
    pub fn relay(&self) -> Option<&DeliveryReport> {
        match self {
            Self::Relayed { relay, .. } => Some(relay),
            Self::NoDestination => None,
        }
    }

    pub fn advisory(&self) -> Option<&AdvisoryOutcome> {
        match self {
            Self::Relayed { advisory, .. } => Some(advisory),
            Self::NoDestination => None,
        }
    }
}

// ── Coordinator ─────────────────────────────────────────────────────────────

/// Routes each inbound event to the opposite side.
///
/// Safe to call concurrently: the correlation cell and the transcript are
/// the only shared state and each operation on them is atomic. Nothing is
/// rolled back when a send fails.
pub struct RelayCoordinator {
    correlation: Arc<CorrelationState>,
    transcript: Arc<TranscriptBuffer>,
    advisor: Option<Advisor>,
    correspondent_out: Arc<dyn CorrespondentOutbound>,
    operator_out: Arc<dyn OperatorOutbound>,
}

impl RelayCoordinator {
    pub fn new(
        correlation: Arc<CorrelationState>,
        transcript: Arc<TranscriptBuffer>,
        correspondent_out: Arc<dyn CorrespondentOutbound>,
        operator_out: Arc<dyn OperatorOutbound>,
    ) -> Self {
        Self {
            correlation,
            transcript,
            advisor: None,
            correspondent_out,
            operator_out,
        }
    }

    pub fn with_advisor(mut self, advisor: Advisor) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn correlation(&self) -> &CorrelationState {
        &self.correlation
    }

    pub fn transcript(&self) -> &TranscriptBuffer {
        &self.transcript
    }

    pub fn has_advisor(&self) -> bool {
        self.advisor.is_some()
    }

    /// Relay `event` on a background task so ingress can acknowledge
    /// immediately.
    pub fn spawn_relay(self: &Arc<Self>, event: RelayEvent) -> JoinHandle<RelayOutcome> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.relay(event).await })
    }

    /// Relay a batch on one background task, one event after another, so
    /// events keep the order the transport delivered them in.
    pub fn spawn_relay_batch(
        self: &Arc<Self>,
        events: Vec<RelayEvent>,
    ) -> JoinHandle<Vec<RelayOutcome>> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut outcomes = Vec::with_capacity(events.len());
            for event in events {
                outcomes.push(this.relay(event).await);
            }
            outcomes
        })
    }

    pub async fn relay(&self, event: RelayEvent) -> RelayOutcome {
        match event {
            RelayEvent::FromCorrespondent {
                correspondent,
                text,
            } => self.relay_from_correspondent(correspondent, text).await,
            RelayEvent::FromOperator { text } => self.relay_from_operator(text).await,
        }
    }

    async fn relay_from_correspondent(
        &self,
        correspondent: CorrespondentId,
        text: String,
    ) -> RelayOutcome {
        self.correlation.set(correspondent.clone());
        self.transcript
            .append(TranscriptEntry::new(Origin::Correspondent, text.clone()));
        debug!(correspondent = %correspondent, text = %text, "inbound correspondent message");

        let relay = self.deliver(Delivery::ToOperator { text }).await;
        if relay.is_delivered() {
            info!(correspondent = %correspondent, "forwarded correspondent message to operator");
        }
        RelayOutcome::Relayed {
            relay,
            advisory: AdvisoryOutcome::NotRequested,
        }
    }

    async fn relay_from_operator(&self, text: String) -> RelayOutcome {
        self.transcript
            .append(TranscriptEntry::new(Origin::Operator, text.clone()));
        debug!(text = %text, "inbound operator message");

        let Some(correspondent) = self.correlation.get() else {
            warn!("no correspondent known yet, dropping operator message");
            return RelayOutcome::NoDestination;
        };

        let snapshot = self.transcript.snapshot();
        let delivery = Delivery::ToCorrespondent {
            correspondent: correspondent.clone(),
            text,
        };

        // The relay send never waits on the advisory call.
        let (relay, analysis) = tokio::join!(self.deliver(delivery), self.analyze(&snapshot));
        if relay.is_delivered() {
            info!(correspondent = %correspondent, "forwarded operator message to correspondent");
        }

        let advisory = match analysis {
            None => AdvisoryOutcome::Disabled,
            Some(Err(e)) => {
                warn!(error = %e, "advisory unavailable, relaying without advice");
                AdvisoryOutcome::Failed(e)
            },
            Some(Ok(result)) => match result.advice() {
                Some(advice) => {
                    let report = self
                        .deliver(Delivery::AdviceToOperator {
                            text: advice.to_string(),
                        })
                        .await;
                    if report.is_delivered() {
                        info!("advice sent to operator");
                    }
                    AdvisoryOutcome::Advised(report)
                },
                None => AdvisoryOutcome::NoAdvice,
            },
        };

        RelayOutcome::Relayed { relay, advisory }
    }

    async fn analyze(
        &self,
        snapshot: &[TranscriptEntry],
    ) -> Option<Result<AdvisoryResult, AdvisoryError>> {
        let advisor = self.advisor.as_ref()?;
        Some(advisor.analyze(snapshot).await)
    }

    async fn deliver(&self, delivery: Delivery) -> DeliveryReport {
        let result = match &delivery {
            Delivery::ToOperator { text } => self.operator_out.send_text(text).await,
            Delivery::ToCorrespondent {
                correspondent,
                text,
            } => self.correspondent_out.send_text(correspondent, text).await,
            Delivery::AdviceToOperator { text } => self.operator_out.send_advice(text).await,
        };

        if let Err(e) = &result {
            let channel = match delivery.target() {
                Origin::Correspondent => self.correspondent_out.channel_type(),
                Origin::Operator => self.operator_out.channel_type(),
            };
            warn!(%channel, error = %e, "delivery failed");
        }

        DeliveryReport { delivery, result }
    }
}
