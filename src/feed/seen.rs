//! Bounded memory of already-delivered posts.

use std::collections::HashMap;

/// Set of post keys delivered during the last few polls.
///
/// Each key is remembered for `retention_polls` polls after the one it was
/// delivered in, then forgotten.
#[derive(Debug, Clone)]
pub struct SeenItems {
    retention_polls: u64,
    current_poll: u64,
    seen: HashMap<String, u64>,
}

impl SeenItems {
    /// Create an empty set with the given retention horizon.
    pub fn new(retention_polls: u32) -> Self {
        Self {
            retention_polls: u64::from(retention_polls),
            current_poll: 0,
            seen: HashMap::new(),
        }
    }

    /// Check whether a key was delivered within the retention horizon.
    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains_key(key)
    }

    /// Record a delivered key in the current poll.
    ///
    /// A key that is already known keeps its original poll, so repeats do
    /// not extend its retention.
    pub fn insert(&mut self, key: &str) {
        self.seen
            .entry(key.to_string())
            .or_insert(self.current_poll);
    }

    /// Move to the next poll and forget keys past the horizon.
    pub fn advance(&mut self) {
        self.current_poll += 1;
        let current = self.current_poll;
        let retention = self.retention_polls;
        self.seen.retain(|_, poll| current - *poll <= retention);
    }

    /// Number of remembered keys.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no keys are remembered.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
