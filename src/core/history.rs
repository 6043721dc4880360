//! Published transition history.
//!
//! Every snapshot a machine publishes after its initial state is recorded as a
//! [`TransitionRecord`]. The history is bounded: once `limit` records are held
//! the oldest is evicted.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of records a machine keeps.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Record of a single published transition.
///
/// # Example
///
/// ```rust
/// use reflow::core::{State, TransitionRecord};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum TaskState {
///     Pending,
///     Running,
/// }
///
/// impl State for TaskState {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Running => "Running",
///         }
///     }
///
///     fn variants() -> &'static [&'static str] {
///         &["Pending", "Running"]
///     }
/// }
///
/// let record = TransitionRecord {
///     sequence: 1,
///     from: TaskState::Pending,
///     to: TaskState::Running,
///     trigger: "action:Start".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert!(record.changed_variant());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// Publication number, starting at 1 for the first transition
    pub sequence: u64,
    /// The state being replaced
    pub from: S,
    /// The published state
    pub to: S,
    /// Label of the trigger that produced the transition
    pub trigger: String,
    /// When the transition was published
    pub timestamp: DateTime<Utc>,
}

impl<S: State> TransitionRecord<S> {
    /// Whether the transition switched state variant.
    pub fn changed_variant(&self) -> bool {
        !self.from.same_variant(&self.to)
    }
}

/// Bounded, ordered history of published transitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    limit: usize,
    records: VecDeque<TransitionRecord<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history holding at most `limit` records.
    ///
    /// A limit of zero disables recording.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            records: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
        }
    }

    /// Record a transition, evicting the oldest record when full.
    pub fn record(&mut self, record: TransitionRecord<S>) {
        if self.limit == 0 {
            return;
        }
        if self.records.len() == self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Path of states traversed by the retained records.
    ///
    /// Returns the `from` state of the oldest record followed by the `to`
    /// state of each record.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reflow::core::{State, StateHistory, TransitionRecord};
    /// use serde::{Deserialize, Serialize};
    /// use chrono::Utc;
    ///
    /// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    /// enum Phase { One, Two, Three }
    ///
    /// impl State for Phase {
    ///     fn name(&self) -> &'static str {
    ///         match self {
    ///             Self::One => "One",
    ///             Self::Two => "Two",
    ///             Self::Three => "Three",
    ///         }
    ///     }
    ///
    ///     fn variants() -> &'static [&'static str] {
    ///         &["One", "Two", "Three"]
    ///     }
    /// }
    ///
    /// let mut history = StateHistory::new(8);
    /// history.record(TransitionRecord {
    ///     sequence: 1,
    ///     from: Phase::One,
    ///     to: Phase::Two,
    ///     trigger: "enter".to_string(),
    ///     timestamp: Utc::now(),
    /// });
    /// history.record(TransitionRecord {
    ///     sequence: 2,
    ///     from: Phase::Two,
    ///     to: Phase::Three,
    ///     trigger: "enter".to_string(),
    ///     timestamp: Utc::now(),
    /// });
    ///
    /// let path = history.get_path();
    /// assert_eq!(path, vec![&Phase::One, &Phase::Two, &Phase::Three]);
    /// ```
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        path.extend(self.records.iter().map(|record| &record.to));
        path
    }

    /// Time between the oldest and newest retained records.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Retained records, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord<S>> {
        self.records.iter()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<S>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
