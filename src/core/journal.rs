//! In-memory record of committed transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One committed transition, stamped at commit time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRecord<I, T> {
    /// State the machine left.
    pub from: I,
    /// Trigger that fired the transition.
    pub trigger: T,
    /// State the machine entered.
    pub to: I,
    /// When the current-state pointer moved.
    pub timestamp: DateTime<Utc>,
}

/// Ordered journal of every transition a machine has committed.
///
/// The journal is diagnostics, not persistence: it lives and dies with the
/// machine instance. Records serialize when the identifier types do.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use cogwheel::{Journal, TransitionRecord};
///
/// let mut journal = Journal::new();
/// journal.record(TransitionRecord {
///     from: "closed",
///     trigger: 1u8,
///     to: "open",
///     timestamp: Utc::now(),
/// });
/// assert_eq!(journal.path(), vec!["closed", "open"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Journal<I, T> {
    records: Vec<TransitionRecord<I, T>>,
}

impl<I, T> Default for Journal<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T> Journal<I, T> {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a committed transition.
    pub fn record(&mut self, record: TransitionRecord<I, T>) {
        self.records.push(record);
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[TransitionRecord<I, T>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl<I: Clone, T> Journal<I, T> {
    /// The sequence of states visited: the first record's source followed by
    /// every destination. Empty when nothing was recorded.
    pub fn path(&self) -> Vec<I> {
        let Some(first) = self.records.first() else {
            return Vec::new();
        };
        let mut path = Vec::with_capacity(self.records.len() + 1);
        path.push(first.from.clone());
        path.extend(self.records.iter().map(|r| r.to.clone()));
        path
    }
}
