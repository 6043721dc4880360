use crate::effects::{MachineError, StateMachine};
use crate::machines::{ActivityAction, ActivityState, CounterAction, CounterState};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Everything the counter screen renders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CounterUiState {
    pub activity: ActivityState,
    pub counter: CounterState,
}

pub struct CounterViewModel {
    activity: StateMachine<ActivityState, ActivityAction>,
    counter: StateMachine<CounterState, CounterAction>,
    ui: watch::Receiver<CounterUiState>,
    task: JoinHandle<()>,
}

impl CounterViewModel {
    /// Must be called from within a Tokio runtime.
    pub fn new(
        activity: StateMachine<ActivityState, ActivityAction>,
        counter: StateMachine<CounterState, CounterAction>,
    ) -> Self {
        let activity_states = activity.subscribe();
        let counter_states = counter.subscribe();
        let initial = CounterUiState {
            activity: activity.current_state(),
            counter: counter.current_state(),
        };
        let (ui, task) = super::combine(
            activity_states,
            counter_states,
            initial,
            |ui, state| ui.activity = state,
            |ui, state| ui.counter = state,
        );
        Self {
            activity,
            counter,
            ui,
            task,
        }
    }

    pub fn ui_state(&self) -> CounterUiState {
        self.ui.borrow().clone()
    }

    /// Receiver notified whenever the snapshot changes.
    pub fn watch(&self) -> watch::Receiver<CounterUiState> {
        self.ui.clone()
    }

    pub fn dispatch(&self, action: CounterAction) -> Result<(), MachineError> {
        self.counter.dispatch(action)
    }

    pub fn dispatch_activity(&self, action: ActivityAction) -> Result<(), MachineError> {
        self.activity.dispatch(action)
    }
}

impl Drop for CounterViewModel {
    fn drop(&mut self) {
        self.task.abort();
    }
}
