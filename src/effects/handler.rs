//! Handler shapes stored in the transition table.
//!
//! User closures are type-erased at registration time into the aliases below
//! so that the table can hold handlers for every variant side by side.

use crate::core::Decision;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use std::fmt::Display;
use std::sync::Arc;

/// Error escaping a handler.
///
/// Handlers are expected to turn collaborator failures into failure states.
/// A `HandlerError` that escapes anyway stops the machine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("handler failed: {message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result produced by every handler body.
pub type HandlerResult<S> = Result<Decision<S>, HandlerError>;

/// Boxed handler body.
pub type HandlerFuture<S> = BoxFuture<'static, HandlerResult<S>>;

/// One-shot handler run when a state variant is entered.
pub(crate) type EnterHandler<S> = Arc<dyn Fn(S) -> HandlerFuture<S> + Send + Sync>;

/// One-shot handler run when an action arrives in a state variant.
pub(crate) type ActionHandler<S, A> = Arc<dyn Fn(A, S) -> HandlerFuture<S> + Send + Sync>;

/// A pending reduction produced by a continuous source.
///
/// Receives the state current at the moment it is processed, not the state
/// the source item was produced in.
pub(crate) type Reduction<S> = Box<dyn FnOnce(S) -> HandlerFuture<S> + Send>;

/// Continuous-while-in-state handler.
///
/// Called with the entered state; the returned stream lives until the machine
/// leaves the variant.
pub(crate) type Collector<S> = Arc<dyn Fn(S) -> BoxStream<'static, Reduction<S>> + Send + Sync>;
