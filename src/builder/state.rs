//! Per-state handler registration.

use crate::core::{Action, Decision, State};
use crate::effects::{ActionHandler, Collector, EnterHandler, HandlerResult, Reduction};
use futures::{FutureExt, Stream, StreamExt};
use std::future::Future;
use std::sync::Arc;

/// Handlers for one state variant, collected inside
/// [`StateMachineBuilder::in_state`](crate::builder::StateMachineBuilder::in_state).
pub struct InStateBuilder<S: State, A: Action> {
    pub(crate) variant: &'static str,
    pub(crate) enter: Vec<EnterHandler<S>>,
    pub(crate) actions: Vec<(&'static str, ActionHandler<S, A>)>,
    pub(crate) collectors: Vec<Collector<S>>,
}

impl<S: State, A: Action> InStateBuilder<S, A> {
    pub(crate) fn new(variant: &'static str) -> Self {
        Self {
            variant,
            enter: Vec::new(),
            actions: Vec::new(),
            collectors: Vec::new(),
        }
    }

    /// Run `handler` each time the machine enters this variant.
    pub fn on_enter<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<S>> + Send + 'static,
    {
        self.enter.push(Arc::new(move |state: S| handler(state).boxed()));
        self
    }

    /// Run `handler` when `action` arrives while in this variant.
    ///
    /// The handler may suspend; the machine processes nothing else until it
    /// returns its decision.
    pub fn on<F, Fut>(mut self, action: &'static str, handler: F) -> Self
    where
        F: Fn(A, S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<S>> + Send + 'static,
    {
        self.actions.push((
            action,
            Arc::new(move |action: A, state: S| handler(action, state).boxed()),
        ));
        self
    }

    /// Synchronous form of [`on`](Self::on) for pure reducers.
    pub fn on_reduce<F>(self, action: &'static str, reducer: F) -> Self
    where
        F: Fn(&A, &S) -> Decision<S> + Send + Sync + 'static,
    {
        self.on(action, move |action, state| {
            let decision = reducer(&action, &state);
            async move { Ok(decision) }
        })
    }

    /// Accept `action` in this variant without changing state.
    ///
    /// Unlike leaving the action unregistered, the action still reaches taps.
    pub fn ignore(self, action: &'static str) -> Self {
        self.on_reduce(action, |_, _| Decision::NoChange)
    }

    /// Consume a stream for as long as the machine stays in this variant.
    ///
    /// `source` is called with the entered state each time the variant is
    /// entered. Every item is handed to `reducer` together with the state
    /// current when the item is processed. Leaving the variant drops the
    /// stream, even mid-emission.
    pub fn collect_while_in_state<T, Src, St, F, Fut>(mut self, source: Src, reducer: F) -> Self
    where
        T: Send + 'static,
        Src: Fn(&S) -> St + Send + Sync + 'static,
        St: Stream<Item = T> + Send + 'static,
        F: Fn(T, S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<S>> + Send + 'static,
    {
        let reducer = Arc::new(reducer);
        self.collectors.push(Arc::new(move |state: S| {
            let reducer = Arc::clone(&reducer);
            source(&state)
                .map(move |item| {
                    let reducer = Arc::clone(&reducer);
                    Box::new(move |current: S| reducer(item, current).boxed()) as Reduction<S>
                })
                .boxed()
        }));
        self
    }
}
