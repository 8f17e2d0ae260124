//! Message history tracking for debugging and diagnostics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Type of message in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Status published by the device
    Publish,
    /// Command received and accepted
    Receive,
    /// Command received and dropped
    Reject,
}

/// A recorded message in the history.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub msg_type: MessageType,
    pub topic: String,
    pub payload: String,
    /// Why a rejected message was dropped
    pub reason: Option<String>,
    /// Device clock, in milliseconds
    pub timestamp: u32,
}

/// Bounded journal of the traffic seen by the session.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    counts: HashMap<MessageType, usize>,
    last_error: Option<String>,
    entries: Vec<HistoryEntry>,
    max_entries: usize,
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            last_error: None,
            entries: Vec::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    pub fn record(&mut self, msg_type: MessageType, topic: &str, payload: &str, timestamp: u32) {
        self.push(HistoryEntry {
            msg_type,
            topic: topic.to_string(),
            payload: payload.to_string(),
            reason: None,
            timestamp,
        });
    }

    /// Record a dropped command; also remembered as the last error.
    pub fn record_rejected(&mut self, topic: &str, payload: &str, reason: &str, timestamp: u32) {
        self.record_error(reason);
        self.push(HistoryEntry {
            msg_type: MessageType::Reject,
            topic: topic.to_string(),
            payload: payload.to_string(),
            reason: Some(reason.to_string()),
            timestamp,
        });
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn count(&self, msg_type: MessageType) -> usize {
        self.counts.get(&msg_type).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.entries.clear();
        self.last_error = None;
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            publish_count: self.count(MessageType::Publish),
            receive_count: self.count(MessageType::Receive),
            reject_count: self.count(MessageType::Reject),
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
        }
    }

    fn push(&mut self, entry: HistoryEntry) {
        *self.counts.entry(entry.msg_type).or_insert(0) += 1;
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }
}

/// Summary of message history for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub publish_count: usize,
    pub receive_count: usize,
    pub reject_count: usize,
    pub total_entries: usize,
    pub last_error: Option<String>,
}
