//! Handler outcomes and the triggers handlers are keyed by.

use super::state::State;
use std::fmt;

/// Outcome of a transition handler.
///
/// `Mutate` and `Override` are applied identically: the returned value
/// replaces the published snapshot wholesale. The two names record intent,
/// a same-variant copy with changes versus a switch to another variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision<S: State> {
    /// Keep the current state; nothing is published.
    NoChange,

    /// Replace the state with a new value of the same variant.
    Mutate(S),

    /// Replace the state with a value of any variant.
    Override(S),
}

impl<S: State> Decision<S> {
    /// Resolve the decision against the current state.
    ///
    /// Returns `None` when nothing should be published: either the decision
    /// is `NoChange` or the new value equals `current`.
    pub fn resolve(self, current: &S) -> Option<S> {
        let next = match self {
            Self::NoChange => return None,
            Self::Mutate(next) | Self::Override(next) => next,
        };

        if next == *current {
            None
        } else {
            Some(next)
        }
    }

    /// Whether this is a `Mutate` that changes variant.
    pub fn is_misdeclared_mutate(&self, current: &S) -> bool {
        matches!(self, Self::Mutate(next) if !next.same_variant(current))
    }
}

/// An event the transition table dispatches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The machine entered a state variant.
    Enter,

    /// An action with the given name arrived.
    Action(&'static str),

    /// A continuous-while-in-state source produced an item.
    Collected,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter => write!(f, "enter"),
            Self::Action(name) => write!(f, "action:{name}"),
            Self::Collected => write!(f, "collected"),
        }
    }
}
