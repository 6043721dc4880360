//! Build errors for machine definitions.

use thiserror::Error;

/// A single problem with a handler registration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistrationError {
    #[error("State variant '{0}' is not declared by the state type")]
    UnknownState(&'static str),

    #[error("Action '{action}' (in state '{state}') is not declared by the action type")]
    UnknownAction {
        state: &'static str,
        action: &'static str,
    },

    #[error("State '{state}' registers more than one {trigger} handler")]
    DuplicateHandler { state: &'static str, trigger: String },

    #[error("Initial state '{0}' is not declared by the state type")]
    UnknownInitialState(&'static str),
}

/// Errors that can occur when building machine definitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("{} invalid registration(s): {}", .0.len(), join(.0))]
    InvalidRegistrations(Vec<RegistrationError>),
}

fn join(errors: &[RegistrationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
