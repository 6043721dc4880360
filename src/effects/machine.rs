//! Machine definitions and running machine handles.

use crate::config::RuntimeConfig;
use crate::core::{Action, State, StateHistory};
use crate::effects::runtime::MachineRuntime;
use crate::effects::stream::{MachineStatus, StateCell, StateSubscription};
use crate::effects::table::TransitionTable;
use crate::tap::TransitionTap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;
use uuid::Uuid;

/// Errors returned by running machines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MachineError {
    #[error("Machine '{label}' is no longer running")]
    Stopped { label: &'static str },

    #[error("No Tokio runtime available to start machine '{label}'")]
    NoRuntime { label: &'static str },
}

/// Unique identifier of a started machine, used in log fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineId(Uuid);

impl MachineId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated, frozen machine definition.
///
/// Produced by [`StateMachineBuilder::build`](crate::builder::StateMachineBuilder::build).
/// One definition can start any number of independent machines.
pub struct MachineDefinition<S: State, A: Action> {
    pub(crate) label: &'static str,
    pub(crate) initial: S,
    pub(crate) table: Arc<TransitionTable<S, A>>,
    pub(crate) taps: Vec<Arc<dyn TransitionTap<S, A>>>,
    pub(crate) runtime: RuntimeConfig,
}

impl<S: State, A: Action> MachineDefinition<S, A> {
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    pub fn table(&self) -> &TransitionTable<S, A> {
        &self.table
    }

    /// Start a machine in the declared initial state.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> Result<StateMachine<S, A>, MachineError> {
        self.start_with(self.initial.clone())
    }

    /// Start a machine from an arbitrary state, e.g. a restored snapshot.
    ///
    /// The enter handler of `initial` runs first, as it would for the
    /// declared initial state.
    pub fn start_with(&self, initial: S) -> Result<StateMachine<S, A>, MachineError> {
        self.launch(initial).map(|(machine, _)| machine)
    }

    /// Start a machine together with a subscription taken before the worker
    /// runs, so the first item is always the declared initial state.
    pub fn start_subscribed(
        &self,
    ) -> Result<(StateMachine<S, A>, StateSubscription<S>), MachineError> {
        self.launch(self.initial.clone())
    }

    fn launch(
        &self,
        initial: S,
    ) -> Result<(StateMachine<S, A>, StateSubscription<S>), MachineError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|_| MachineError::NoRuntime { label: self.label })?;

        let id = MachineId::new();
        let cell = Arc::new(StateCell::new(
            initial,
            self.runtime.stream_capacity,
            self.runtime.history_limit,
        ));
        let subscription = cell.subscribe();
        let (sender, mailbox) = mpsc::unbounded_channel();
        let runtime = MachineRuntime::new(
            id,
            self.label,
            Arc::clone(&self.table),
            self.taps.clone(),
            Arc::clone(&cell),
            mailbox,
        );
        let worker = handle.spawn(runtime.run());

        let machine = StateMachine {
            inner: Arc::new(Inner {
                id,
                label: self.label,
                sender,
                cell,
                worker: Mutex::new(Some(worker)),
            }),
        };
        Ok((machine, subscription))
    }
}

struct Inner<S: State, A: Action> {
    id: MachineId,
    label: &'static str,
    sender: mpsc::UnboundedSender<A>,
    cell: Arc<StateCell<S>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<S: State, A: Action> Drop for Inner<S, A> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            worker.abort();
        }
        self.cell.close(MachineStatus::Stopped);
    }
}

/// Handle to a running machine.
///
/// Clones share the same machine. When the last clone is dropped the worker
/// is aborted, cancelling any in-flight handler and continuous source, and
/// every subscription ends.
pub struct StateMachine<S: State, A: Action> {
    inner: Arc<Inner<S, A>>,
}

impl<S: State, A: Action> Clone for StateMachine<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, A: Action> StateMachine<S, A> {
    pub fn id(&self) -> MachineId {
        self.inner.id
    }

    pub fn label(&self) -> &'static str {
        self.inner.label
    }

    /// Latest published snapshot. Never waits on a running handler.
    pub fn current_state(&self) -> S {
        self.inner.cell.current()
    }

    /// Queue an action and return immediately.
    ///
    /// The action is evaluated against the state current when the worker
    /// reaches it. Fails only when the machine has stopped.
    pub fn dispatch(&self, action: A) -> Result<(), MachineError> {
        let stopped = MachineError::Stopped {
            label: self.inner.label,
        };
        if !self.inner.cell.status().is_running() {
            return Err(stopped);
        }
        trace!(machine = %self.inner.id, action = action.name(), "action dispatched");
        self.inner.sender.send(action).map_err(|_| stopped)
    }

    /// Subscribe to published states, starting with the current snapshot.
    pub fn subscribe(&self) -> StateSubscription<S> {
        self.inner.cell.subscribe()
    }

    /// Recent published transitions.
    pub fn history(&self) -> StateHistory<S> {
        self.inner.cell.history()
    }

    pub fn status(&self) -> MachineStatus {
        self.inner.cell.status()
    }

    /// Number of publications a subscriber may fall behind before skipping.
    pub fn stream_capacity(&self) -> usize {
        self.inner.cell.capacity()
    }

    /// Stop the machine and wait for its worker to exit.
    ///
    /// In-flight handlers are cancelled. Other clones of this handle observe
    /// `MachineStatus::Stopped`.
    pub async fn shutdown(&self) {
        let worker = self.inner.worker.lock().take();
        if let Some(worker) = worker {
            worker.abort();
            // Cancellation is the expected outcome here.
            let _ = worker.await;
        }
        self.inner.cell.close(MachineStatus::Stopped);
    }
}
