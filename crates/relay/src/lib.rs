//! Relay and correlation engine.
//!
//! Tracks which correspondent spoke last, keeps a bounded transcript of the
//! conversation across both sides, optionally asks a reasoning provider for
//! advice aimed at the operator, and hands exactly one relay delivery per
//! inbound event to the opposite side's outbound adapter.

pub mod advisor;
pub mod coordinator;
pub mod correlation;
pub mod error;
pub mod transcript;

pub use {
    advisor::{AdvisoryError, AdvisoryResult, Advisor},
    coordinator::{AdvisoryOutcome, Delivery, DeliveryReport, RelayCoordinator, RelayOutcome},
    correlation::CorrelationState,
    error::{Error, Result},
    transcript::{DEFAULT_CAPACITY, TranscriptBuffer, TranscriptEntry},
};
