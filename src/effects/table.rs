//! Frozen transition table.

use crate::core::{Action, State};
use crate::effects::handler::{ActionHandler, Collector, EnterHandler};
use std::collections::HashMap;
use std::marker::PhantomData;

/// Handlers registered for one state variant.
pub(crate) struct StateHandlers<S: State, A: Action> {
    pub(crate) on_enter: Option<EnterHandler<S>>,
    pub(crate) actions: HashMap<&'static str, ActionHandler<S, A>>,
    pub(crate) collectors: Vec<Collector<S>>,
}

impl<S: State, A: Action> Default for StateHandlers<S, A> {
    fn default() -> Self {
        Self {
            on_enter: None,
            actions: HashMap::new(),
            collectors: Vec::new(),
        }
    }
}

/// Mapping from (state variant, trigger) to handler.
///
/// Built once by [`StateMachineBuilder`](crate::builder::StateMachineBuilder)
/// and immutable afterwards; machines share it behind an `Arc`.
pub struct TransitionTable<S: State, A: Action> {
    states: HashMap<&'static str, StateHandlers<S, A>>,
    _phantom: PhantomData<A>,
}

impl<S: State, A: Action> TransitionTable<S, A> {
    pub(crate) fn new(states: HashMap<&'static str, StateHandlers<S, A>>) -> Self {
        Self {
            states,
            _phantom: PhantomData,
        }
    }

    pub(crate) fn enter_handler(&self, variant: &str) -> Option<&EnterHandler<S>> {
        self.states.get(variant)?.on_enter.as_ref()
    }

    pub(crate) fn action_handler(&self, variant: &str, action: &str) -> Option<&ActionHandler<S, A>> {
        self.states.get(variant)?.actions.get(action)
    }

    pub(crate) fn collectors(&self, variant: &str) -> &[Collector<S>] {
        self.states
            .get(variant)
            .map(|handlers| handlers.collectors.as_slice())
            .unwrap_or_default()
    }

    /// Whether `action` has a handler while in `variant`.
    pub fn handles(&self, variant: &str, action: &str) -> bool {
        self.action_handler(variant, action).is_some()
    }

    /// Whether `variant` has an enter handler.
    pub fn has_enter(&self, variant: &str) -> bool {
        self.enter_handler(variant).is_some()
    }

    /// Number of continuous sources registered for `variant`.
    pub fn collector_count(&self, variant: &str) -> usize {
        self.collectors(variant).len()
    }

    /// Variants with at least one registered handler.
    pub fn registered_states(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.states.keys().copied()
    }
}
