use std::sync::RwLock;

use {bridge_common::CorrespondentId, tracing::debug};

/// The correspondent that most recently wrote in.
///
/// Last write wins. Each `set`/`get` is atomic, so racing writers leave one
/// of their values behind, never a torn one.
#[derive(Debug, Default)]
pub struct CorrelationState {
    current: RwLock<Option<CorrespondentId>>,
}

impl CorrelationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, id: CorrespondentId) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        debug!(correspondent = %id, previous = ?current.as_ref().map(CorrespondentId::as_str), "correspondent updated");
        *current = Some(id);
    }

    pub fn get(&self) -> Option<CorrespondentId> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_set(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}
