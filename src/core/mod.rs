//! Core state machine types.
//!
//! This module contains the pure vocabulary shared by every machine:
//! - State and Action definitions via the `State` and `Action` traits
//! - Handler outcomes (`Decision`) and the `Trigger` keys they are looked up by
//! - Bounded history of published transitions
//!
//! Nothing here performs IO or spawns tasks; the runtime lives in `effects`.

mod decision;
mod history;
mod state;

pub use decision::{Decision, Trigger};
pub use history::{StateHistory, TransitionRecord, DEFAULT_HISTORY_LIMIT};
pub use state::{Action, State};
