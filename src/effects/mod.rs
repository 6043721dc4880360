//! The reactive runtime around the pure core.
//!
//! This module provides the "imperative shell": a frozen transition table,
//! one worker task per running machine that executes handler bodies in
//! order, and replayable subscriptions to published states.
//!
//! # Key Concepts
//!
//! - **Table**: handlers keyed by (state variant, trigger), frozen at build
//! - **Runtime**: a single worker per machine; handlers never overlap
//! - **Subscriptions**: latest snapshot first, then every publication in order
//! - **Continuous sources**: live exactly as long as their state variant

mod handler;
mod machine;
mod runtime;
mod stream;
mod table;

pub use handler::{HandlerError, HandlerFuture, HandlerResult};
pub(crate) use handler::{ActionHandler, Collector, EnterHandler, Reduction};
pub use machine::{MachineDefinition, MachineError, MachineId, StateMachine};
pub use stream::{MachineStatus, StateSubscription};
pub(crate) use table::StateHandlers;
pub use table::TransitionTable;
