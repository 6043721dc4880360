//! Builder for constructing machine definitions.

use crate::builder::error::{BuildError, RegistrationError};
use crate::builder::state::InStateBuilder;
use crate::config::RuntimeConfig;
use crate::core::{Action, State, Trigger};
use crate::effects::{MachineDefinition, StateHandlers, TransitionTable};
use crate::tap::TransitionTap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing machine definitions with a fluent API.
///
/// Handlers may only be registered here; [`build`](Self::build) validates
/// every registration and freezes the table.
pub struct StateMachineBuilder<S: State, A: Action> {
    label: &'static str,
    initial: Option<S>,
    states: Vec<InStateBuilder<S, A>>,
    taps: Vec<Arc<dyn TransitionTap<S, A>>>,
    runtime: RuntimeConfig,
}

impl<S: State, A: Action> StateMachineBuilder<S, A> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            label: "machine",
            initial: None,
            states: Vec::new(),
            taps: Vec::new(),
            runtime: RuntimeConfig::default(),
        }
    }

    /// Name used in log fields and errors.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Register the handlers for one state variant.
    pub fn in_state<F>(mut self, variant: &'static str, configure: F) -> Self
    where
        F: FnOnce(InStateBuilder<S, A>) -> InStateBuilder<S, A>,
    {
        self.states.push(configure(InStateBuilder::new(variant)));
        self
    }

    /// Add a fire-and-forget observer of processed actions.
    pub fn tap(mut self, tap: impl TransitionTap<S, A>) -> Self {
        self.taps.push(Arc::new(tap));
        self
    }

    pub fn runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Validate every registration and freeze the table.
    ///
    /// All registration problems are reported together.
    pub fn build(self) -> Result<MachineDefinition<S, A>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        match validate(&initial, &self.states) {
            Validation::Success(()) => {}
            Validation::Failure(errors) => {
                return Err(BuildError::InvalidRegistrations(
                    errors.iter().cloned().collect(),
                ));
            }
        }

        let mut states: HashMap<&'static str, StateHandlers<S, A>> = HashMap::new();
        for block in self.states {
            let handlers = states.entry(block.variant).or_default();
            if let Some(enter) = block.enter.into_iter().next() {
                handlers.on_enter = Some(enter);
            }
            handlers.actions.extend(block.actions);
            handlers.collectors.extend(block.collectors);
        }

        Ok(MachineDefinition {
            label: self.label,
            initial,
            table: Arc::new(TransitionTable::new(states)),
            taps: self.taps,
            runtime: self.runtime,
        })
    }
}

impl<S: State, A: Action> Default for StateMachineBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Check registrations, accumulating ALL problems.
fn validate<S: State, A: Action>(
    initial: &S,
    blocks: &[InStateBuilder<S, A>],
) -> Validation<(), NonEmptyVec<RegistrationError>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<RegistrationError>>> = Vec::new();
    let states = S::variants();
    let actions = A::variants();

    if !states.contains(&initial.name()) {
        checks.push(Validation::fail(RegistrationError::UnknownInitialState(
            initial.name(),
        )));
    }

    let mut seen: HashSet<(&'static str, Trigger)> = HashSet::new();
    for block in blocks {
        if !states.contains(&block.variant) {
            checks.push(Validation::fail(RegistrationError::UnknownState(block.variant)));
        }

        let triggers = block
            .enter
            .iter()
            .map(|_| Trigger::Enter)
            .chain(block.actions.iter().map(|(name, _)| Trigger::Action(*name)));

        for trigger in triggers {
            if let Trigger::Action(action) = trigger {
                if !actions.contains(&action) {
                    checks.push(Validation::fail(RegistrationError::UnknownAction {
                        state: block.variant,
                        action,
                    }));
                }
            }

            let check = if seen.insert((block.variant, trigger)) {
                Validation::success(())
            } else {
                Validation::fail(RegistrationError::DuplicateHandler {
                    state: block.variant,
                    trigger: trigger.to_string(),
                })
            };
            checks.push(check);
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Decision;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Busy(u32),
    }

    crate::impl_state!(TestState { Idle, Busy });

    #[derive(Clone, Debug)]
    enum TestAction {
        Start,
        Stop,
    }

    crate::impl_action!(TestAction { Start, Stop });

    #[test]
    fn builder_validates_required_fields() {
        let result = StateMachineBuilder::<TestState, TestAction>::new().build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn fluent_api_builds_frozen_table() {
        let definition = StateMachineBuilder::<TestState, TestAction>::new()
            .label("test")
            .initial(TestState::Idle)
            .in_state("Idle", |spec| {
                spec.on_reduce("Start", |_, _| Decision::Override(TestState::Busy(0)))
            })
            .in_state("Busy", |spec| {
                spec.on_enter(|_| async { Ok(Decision::NoChange) })
                    .ignore("Start")
                    .on_reduce("Stop", |_, _| Decision::Override(TestState::Idle))
            })
            .build()
            .unwrap();

        let table = definition.table();
        assert_eq!(definition.label(), "test");
        assert_eq!(definition.initial_state(), &TestState::Idle);
        assert!(table.handles("Idle", "Start"));
        assert!(!table.handles("Idle", "Stop"));
        assert!(table.handles("Busy", "Stop"));
        assert!(table.has_enter("Busy"));
        assert!(!table.has_enter("Idle"));
        assert_eq!(table.collector_count("Busy"), 0);
    }

    #[test]
    fn registrations_without_handlers_build() {
        let definition = StateMachineBuilder::<TestState, TestAction>::new()
            .initial(TestState::Idle)
            .build()
            .unwrap();

        assert_eq!(definition.table().registered_states().count(), 0);
    }

    #[test]
    fn validation_accumulates_all_errors() {
        let result = StateMachineBuilder::<TestState, TestAction>::new()
            .initial(TestState::Idle)
            .in_state("Missing", |spec| spec.ignore("Start"))
            .in_state("Idle", |spec| spec.ignore("Start").ignore("Start").ignore("Jump"))
            .in_state("Busy", |spec| {
                spec.on_enter(|_| async { Ok(Decision::NoChange) })
                    .on_enter(|_| async { Ok(Decision::NoChange) })
            })
            .build();

        let Err(BuildError::InvalidRegistrations(errors)) = result else {
            panic!("expected registration errors");
        };

        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&RegistrationError::UnknownState("Missing")));
        assert!(errors.contains(&RegistrationError::UnknownAction {
            state: "Idle",
            action: "Jump",
        }));
        assert!(errors.contains(&RegistrationError::DuplicateHandler {
            state: "Idle",
            trigger: "action:Start".to_string(),
        }));
        assert!(errors.contains(&RegistrationError::DuplicateHandler {
            state: "Busy",
            trigger: "enter".to_string(),
        }));
    }

    #[test]
    fn duplicates_are_detected_across_blocks() {
        let result = StateMachineBuilder::<TestState, TestAction>::new()
            .initial(TestState::Idle)
            .in_state("Idle", |spec| spec.ignore("Stop"))
            .in_state("Idle", |spec| spec.ignore("Stop"))
            .build();

        let Err(err) = result else {
            panic!("expected a duplicate registration error");
        };
        assert_eq!(
            err.to_string(),
            "1 invalid registration(s): State 'Idle' registers more than one action:Stop handler"
        );
    }
}
