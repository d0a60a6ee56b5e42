use std::{collections::VecDeque, sync::Mutex};

use {bridge_common::Origin, serde::Serialize};

use crate::{Error, Result};

/// Number of entries kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 20;

/// One message as seen by the bridge.
///
/// Serializes as `{"sender": ..., "content": ...}`, the shape the advisory
/// prompt embeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    #[serde(rename = "sender")]
    pub origin: Origin,
    #[serde(rename = "content")]
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(origin: Origin, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
        }
    }
}

/// Bounded, insertion-ordered log of recent messages from both sides.
///
/// Holds at most `capacity` entries; appending past that evicts from the
/// head so the remainder keeps its relative order.
#[derive(Debug)]
pub struct TranscriptBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<TranscriptEntry>>,
}

impl TranscriptBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn append(&self, entry: TranscriptEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<TranscriptEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TranscriptBuffer {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            entries: Mutex::new(VecDeque::with_capacity(DEFAULT_CAPACITY)),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use {super::*, rstest::rstest};

    fn texts(entries: &[TranscriptEntry]) -> Vec<String> {
        entries.iter().map(|e| e.text.clone()).collect()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(TranscriptBuffer::new(0), Err(Error::ZeroCapacity)));
    }

    #[test]
    fn default_capacity_is_twenty() {
        assert_eq!(TranscriptBuffer::default().capacity(), 20);
    }

    #[rstest]
    #[case(1, 5)]
    #[case(3, 3)]
    #[case(3, 10)]
    #[case(20, 25)]
    fn keeps_last_n_in_order(#[case] capacity: usize, #[case] appended: usize) {
        let buf = TranscriptBuffer::new(capacity).unwrap();
        for i in 1..=appended {
            buf.append(TranscriptEntry::new(Origin::Correspondent, format!("m{i}")));
        }

        let snap = buf.snapshot();
        let kept = appended.min(capacity);
        assert_eq!(snap.len(), kept);
        let expected: Vec<String> = (appended - kept + 1..=appended)
            .map(|i| format!("m{i}"))
            .collect();
        assert_eq!(texts(&snap), expected);
    }

    #[test]
    fn snapshot_is_idempotent_and_detached() {
        let buf = TranscriptBuffer::new(4).unwrap();
        buf.append(TranscriptEntry::new(Origin::Correspondent, "hello"));
        buf.append(TranscriptEntry::new(Origin::Operator, "hi back"));

        let first = buf.snapshot();
        let second = buf.snapshot();
        assert_eq!(first, second);

        buf.append(TranscriptEntry::new(Origin::Correspondent, "later"));
        assert_eq!(first.len(), 2);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn serializes_as_sender_and_content() {
        let entry = TranscriptEntry::new(Origin::Operator, "ok");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({ "sender": "operator", "content": "ok" }));
    }

    #[test]
    fn concurrent_appends_never_exceed_capacity() {
        let buf = Arc::new(TranscriptBuffer::new(8).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let buf = Arc::clone(&buf);
                thread::spawn(move || {
                    for i in 0..50 {
                        buf.append(TranscriptEntry::new(Origin::Operator, format!("{t}-{i}")));
                        assert!(buf.snapshot().len() <= 8);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(buf.len(), 8);
    }
}
