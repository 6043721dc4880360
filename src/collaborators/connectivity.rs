//! Connectivity snapshots and change feeds.

use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    Available,
    Unavailable,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Source of network connectivity information.
pub trait ConnectivityProvider: Send + Sync + 'static {
    /// Connectivity right now.
    fn current(&self) -> ConnectionState;

    /// Changes after the call, in order. Never yields the value `current`
    /// returned at subscribe time unless it changes away and back.
    fn changes(&self) -> BoxStream<'static, ConnectionState>;
}

/// In-process connectivity source driven by [`set`](Self::set).
///
/// Hosts forward platform callbacks into it; tests use it to script changes.
pub struct SharedConnectivity {
    current: Mutex<ConnectionState>,
    sender: broadcast::Sender<ConnectionState>,
}

impl SharedConnectivity {
    pub fn new(initial: ConnectionState) -> Self {
        let (sender, _) = broadcast::channel(32);
        Self {
            current: Mutex::new(initial),
            sender,
        }
    }

    /// Record a new connectivity state.
    ///
    /// Returns `false` and emits nothing if the state did not change.
    pub fn set(&self, state: ConnectionState) -> bool {
        let mut current = self.current.lock();
        if *current == state {
            return false;
        }
        *current = state;
        debug!(%state, "connectivity changed");
        // Sent under the lock so subscribers observe changes in order.
        let _ = self.sender.send(state);
        true
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ConnectivityProvider for SharedConnectivity {
    fn current(&self) -> ConnectionState {
        *self.current.lock()
    }

    fn changes(&self) -> BoxStream<'static, ConnectionState> {
        let receiver = self.sender.subscribe();
        stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(state) => return Some((state, receiver)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "connectivity subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn changes_yield_only_later_updates() {
        let connectivity = SharedConnectivity::new(ConnectionState::Available);
        let mut changes = connectivity.changes();

        assert!(connectivity.set(ConnectionState::Unavailable));
        assert!(!connectivity.set(ConnectionState::Unavailable));
        assert!(connectivity.set(ConnectionState::Available));

        assert_eq!(changes.next().await, Some(ConnectionState::Unavailable));
        assert_eq!(changes.next().await, Some(ConnectionState::Available));
        assert_eq!(connectivity.current(), ConnectionState::Available);
    }

    #[tokio::test]
    async fn dropping_the_stream_unsubscribes() {
        let connectivity = SharedConnectivity::new(ConnectionState::Available);
        let changes = connectivity.changes();
        assert_eq!(connectivity.subscriber_count(), 1);

        drop(changes);
        assert_eq!(connectivity.subscriber_count(), 0);
    }
}
