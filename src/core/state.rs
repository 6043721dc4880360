//! State and Action traits for reactive state machines.
//!
//! Every machine is described by a closed set of state variants and a closed
//! set of action variants. Both report a stable variant name, which is the key
//! the transition table dispatches on.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// States are immutable values. A transition never edits a state in place;
/// it builds a new value and the runtime replaces the published snapshot.
///
/// # Required Traits
///
/// - `Clone`: snapshots are handed to handlers and subscribers
/// - `PartialEq`: identical consecutive snapshots are not republished
/// - `Debug`: states are logged on every transition
/// - `Serialize` + `Deserialize`: states are recorded in history
///
/// # Example
///
/// ```rust
/// use reflow::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum DoorState {
///     Closed,
///     Open { visitors: u32 },
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open { .. } => "Open",
///         }
///     }
///
///     fn variants() -> &'static [&'static str] {
///         &["Closed", "Open"]
///     }
/// }
///
/// assert_eq!(DoorState::Open { visitors: 2 }.name(), "Open");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Name of the variant this value belongs to.
    ///
    /// Returns a static string reference for zero-cost naming. Two values of
    /// the same variant must return the same name regardless of payload.
    fn name(&self) -> &'static str;

    /// Every variant name this state type declares.
    fn variants() -> &'static [&'static str]
    where
        Self: Sized;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Error states carry a failure cause as ordinary data; observers react to
    /// them through normal state matching.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }

    /// Whether `other` is the same variant as `self`.
    fn same_variant(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

/// Trait for machine inputs.
///
/// Actions are dispatched by callers and looked up in the transition table by
/// [`Action::name`].
pub trait Action: Clone + Debug + Send + Sync + 'static {
    /// Name of the variant this action belongs to.
    fn name(&self) -> &'static str;

    /// Every variant name this action type declares.
    fn variants() -> &'static [&'static str]
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing { step: u32 },
        Complete,
        Failed(String),
    }

    impl State for TestState {
        fn name(&self) -> &'static str {
            match self {
                Self::Initial => "Initial",
                Self::Processing { .. } => "Processing",
                Self::Complete => "Complete",
                Self::Failed(_) => "Failed",
            }
        }

        fn variants() -> &'static [&'static str] {
            &["Initial", "Processing", "Complete", "Failed"]
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Complete | Self::Failed(_))
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Failed(_))
        }
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Advance,
        Abort(String),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                Self::Advance => "Advance",
                Self::Abort(_) => "Abort",
            }
        }

        fn variants() -> &'static [&'static str] {
            &["Advance", "Abort"]
        }
    }

    #[test]
    fn state_name_ignores_payload() {
        assert_eq!(TestState::Processing { step: 1 }.name(), "Processing");
        assert_eq!(TestState::Processing { step: 9 }.name(), "Processing");
        assert_eq!(TestState::Failed("boom".into()).name(), "Failed");
    }

    #[test]
    fn same_variant_compares_names_only() {
        let a = TestState::Processing { step: 1 };
        let b = TestState::Processing { step: 2 };
        assert!(a.same_variant(&b));
        assert_ne!(a, b);
        assert!(!a.same_variant(&TestState::Initial));
    }

    #[test]
    fn flags_default_and_override() {
        assert!(!TestState::Initial.is_final());
        assert!(TestState::Complete.is_final());
        assert!(!TestState::Complete.is_error());
        assert!(TestState::Failed("x".into()).is_error());
    }

    #[test]
    fn declared_variants_cover_every_name() {
        let samples = [
            TestState::Initial,
            TestState::Processing { step: 0 },
            TestState::Complete,
            TestState::Failed(String::new()),
        ];
        for sample in samples {
            assert!(TestState::variants().contains(&sample.name()));
        }
        assert!(TestAction::variants().contains(&TestAction::Abort("x".into()).name()));
        assert!(TestAction::variants().contains(&TestAction::Advance.name()));
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Processing { step: 3 };
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
