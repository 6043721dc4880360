//! Published state cell and replayable subscriptions.
//!
//! The cell holds the latest snapshot, the transition history and the machine
//! status behind one lock. Publishing and subscribing both take that lock, so
//! a new subscriber either sees a publication as its replayed snapshot or
//! receives it from the channel, never both and never neither.

use crate::core::{State, StateHistory, TransitionRecord, Trigger};
use chrono::Utc;
use futures::stream::{self, Stream};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::warn;

/// Lifecycle status of a running machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MachineStatus {
    /// Worker is processing triggers.
    Running,

    /// Worker exited after shutdown or after every handle was dropped.
    Stopped,

    /// A handler error escaped; the machine no longer processes triggers.
    Failed(String),
}

impl MachineStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

struct Shared<S: State> {
    current: S,
    history: StateHistory<S>,
    sequence: u64,
    status: MachineStatus,
    sender: Option<broadcast::Sender<S>>,
}

pub(crate) struct StateCell<S: State> {
    shared: Mutex<Shared<S>>,
    capacity: usize,
}

impl<S: State> StateCell<S> {
    pub(crate) fn new(initial: S, capacity: usize, history_limit: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            shared: Mutex::new(Shared {
                current: initial,
                history: StateHistory::new(history_limit),
                sequence: 0,
                status: MachineStatus::Running,
                sender: Some(sender),
            }),
            capacity,
        }
    }

    pub(crate) fn current(&self) -> S {
        self.shared.lock().current.clone()
    }

    pub(crate) fn history(&self) -> StateHistory<S> {
        self.shared.lock().history.clone()
    }

    pub(crate) fn status(&self) -> MachineStatus {
        self.shared.lock().status.clone()
    }

    /// Replace the current snapshot and notify subscribers.
    ///
    /// Returns the publication sequence number.
    pub(crate) fn publish(&self, next: S, trigger: Trigger) -> u64 {
        let mut shared = self.shared.lock();
        let from = std::mem::replace(&mut shared.current, next.clone());
        shared.sequence += 1;
        let sequence = shared.sequence;
        shared.history.record(TransitionRecord {
            sequence,
            from,
            to: next.clone(),
            trigger: trigger.to_string(),
            timestamp: Utc::now(),
        });
        if let Some(sender) = &shared.sender {
            // No receivers is fine: the snapshot stays readable via `current`.
            let _ = sender.send(next);
        }
        sequence
    }

    pub(crate) fn subscribe(&self) -> StateSubscription<S> {
        let shared = self.shared.lock();
        let receiver = match &shared.sender {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        };
        StateSubscription {
            replay: Some(shared.current.clone()),
            receiver,
        }
    }

    /// Mark the machine finished and end every subscription.
    pub(crate) fn close(&self, status: MachineStatus) {
        let mut shared = self.shared.lock();
        if shared.status.is_running() {
            shared.status = status;
        }
        shared.sender = None;
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Replayable view of a machine's published states.
///
/// The first item is the snapshot current at subscribe time; every later
/// publication follows in order. The subscription ends only when the machine
/// stops.
pub struct StateSubscription<S: State> {
    replay: Option<S>,
    receiver: broadcast::Receiver<S>,
}

impl<S: State> StateSubscription<S> {
    /// Wait for the next published state.
    ///
    /// Returns `None` once the machine has stopped and every buffered
    /// publication has been delivered.
    pub async fn next(&mut self) -> Option<S> {
        if let Some(state) = self.replay.take() {
            return Some(state);
        }
        loop {
            match self.receiver.recv().await {
                Ok(state) => return Some(state),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "state subscriber lagged; skipping missed publications");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Convert into a `futures::Stream`.
    pub fn into_stream(self) -> impl Stream<Item = S> + Send + Unpin + 'static {
        Box::pin(stream::unfold(self, |mut subscription| async move {
            let state = subscription.next().await?;
            Some((state, subscription))
        }))
    }
}
