use crate::effects::{MachineError, StateMachine};
use crate::machines::{ActivityAction, ActivityState, SearchAction, SearchState};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Everything the news search screen renders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewsSearchUiState {
    pub activity: ActivityState,
    pub search: SearchState,
}

pub struct NewsSearchViewModel {
    activity: StateMachine<ActivityState, ActivityAction>,
    ui: watch::Receiver<NewsSearchUiState>,
    input: mpsc::UnboundedSender<String>,
    tasks: [JoinHandle<()>; 2],
}

impl NewsSearchViewModel {
    /// Raw text passed to [`input_text`](Self::input_text) is dispatched
    /// once it has been stable for `debounce`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        activity: StateMachine<ActivityState, ActivityAction>,
        search: StateMachine<SearchState, SearchAction>,
        debounce: Duration,
    ) -> Self {
        let initial = NewsSearchUiState {
            activity: activity.current_state(),
            search: search.current_state(),
        };
        let (ui, combiner) = super::combine(
            activity.subscribe(),
            search.subscribe(),
            initial,
            |ui, state| ui.activity = state,
            |ui, state| ui.search = state,
        );
        let (input, texts) = mpsc::unbounded_channel();
        let debouncer = tokio::spawn(debounce_input(texts, search, debounce));

        Self {
            activity,
            ui,
            input,
            tasks: [combiner, debouncer],
        }
    }

    pub fn ui_state(&self) -> NewsSearchUiState {
        self.ui.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<NewsSearchUiState> {
        self.ui.clone()
    }

    /// Record the latest text of the search field.
    pub fn input_text(&self, text: impl Into<String>) {
        // The debouncer only stops when this view model is dropped.
        let _ = self.input.send(text.into());
    }

    pub fn dispatch_activity(&self, action: ActivityAction) -> Result<(), MachineError> {
        self.activity.dispatch(action)
    }
}

impl Drop for NewsSearchViewModel {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Dispatch the latest text after `quiet` without newer input.
async fn debounce_input(
    mut texts: mpsc::UnboundedReceiver<String>,
    search: StateMachine<SearchState, SearchAction>,
    quiet: Duration,
) {
    while let Some(mut text) = texts.recv().await {
        loop {
            match tokio::time::timeout(quiet, texts.recv()).await {
                Ok(Some(newer)) => text = newer,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        if text.trim().is_empty() || search.current_state().query() == text {
            trace!(text = %text, "debounced input unchanged; not dispatched");
            continue;
        }
        debug!(text = %text, "dispatching debounced search input");
        if search.dispatch(SearchAction::InputSearch(text)).is_err() {
            return;
        }
    }
}
