//! Application-wide state: network connectivity.

use crate::builder::{BuildError, StateMachineBuilder};
use crate::collaborators::{ConnectionState, ConnectivityProvider};
use crate::config::RuntimeConfig;
use crate::core::Decision;
use crate::effects::MachineDefinition;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const LABEL: &str = "app";

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum AppState {
    Uninitialized,
    Initialized { connection: ConnectionState },
}

crate::impl_state!(AppState { Uninitialized, Initialized });

impl AppState {
    pub fn connection(&self) -> Option<ConnectionState> {
        match self {
            Self::Uninitialized => None,
            Self::Initialized { connection } => Some(*connection),
        }
    }
}

/// The app machine is driven entirely by its connectivity source.
#[derive(Clone, Debug)]
pub enum AppAction {}

crate::impl_action!(AppAction {});

pub fn builder(
    connectivity: Arc<dyn ConnectivityProvider>,
    runtime: &RuntimeConfig,
) -> StateMachineBuilder<AppState, AppAction> {
    let snapshot = Arc::clone(&connectivity);

    StateMachineBuilder::<AppState, AppAction>::new()
        .label(LABEL)
        .initial(AppState::Uninitialized)
        .runtime(runtime.clone())
        .in_state("Uninitialized", move |spec| {
            spec.on_enter(move |_| {
                let connection = snapshot.current();
                async move { Ok(Decision::Override(AppState::Initialized { connection })) }
            })
        })
        .in_state("Initialized", move |spec| {
            spec.collect_while_in_state(
                move |_| {
                    // Subscribe before reading so a change in between is not lost;
                    // a repeat of the entered value resolves to no change.
                    let changes = connectivity.changes();
                    stream::iter([connectivity.current()]).chain(changes)
                },
                |connection, _| async move {
                    Ok(Decision::Mutate(AppState::Initialized { connection }))
                },
            )
        })
}

pub fn definition(
    connectivity: Arc<dyn ConnectivityProvider>,
    runtime: &RuntimeConfig,
) -> Result<MachineDefinition<AppState, AppAction>, BuildError> {
    builder(connectivity, runtime).build()
}
