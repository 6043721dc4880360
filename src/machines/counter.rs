//! A counter that can be disabled, re-enabled after a delay, and reset.
//!
//! Increment and Decrement keep working while disabled; `enabled` only
//! tells the UI whether to offer the buttons.

use crate::builder::{BuildError, StateMachineBuilder};
use crate::config::{CounterConfig, RuntimeConfig};
use crate::core::Decision;
use crate::effects::MachineDefinition;
use crate::tap::LogTap;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const LABEL: &str = "counter";

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum CounterState {
    Uninitialized,
    Counter { counter: i64, enabled: bool },
}

crate::impl_state!(CounterState { Uninitialized, Counter });

impl CounterState {
    pub fn counter(counter: i64, enabled: bool) -> Self {
        Self::Counter { counter, enabled }
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self::Uninitialized
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterAction {
    /// Leave `Uninitialized` and start counting from zero.
    Start,
    Increment,
    Decrement,
    Reset,
    Disable,
    Enable,
}

crate::impl_action!(CounterAction {
    Start,
    Increment,
    Decrement,
    Reset,
    Disable,
    Enable
});

/// Copy the counter payload with changes.
fn update(state: &CounterState, f: impl FnOnce(i64, bool) -> (i64, bool)) -> Decision<CounterState> {
    match state {
        CounterState::Counter { counter, enabled } => {
            let (counter, enabled) = f(*counter, *enabled);
            Decision::Mutate(CounterState::Counter { counter, enabled })
        }
        CounterState::Uninitialized => Decision::NoChange,
    }
}

pub fn builder(
    config: &CounterConfig,
    runtime: &RuntimeConfig,
) -> StateMachineBuilder<CounterState, CounterAction> {
    let enable_delay = config.enable_delay();

    StateMachineBuilder::<CounterState, CounterAction>::new()
        .label(LABEL)
        .initial(CounterState::Uninitialized)
        .runtime(runtime.clone())
        .tap(LogTap::new(LABEL))
        .in_state("Uninitialized", |spec| {
            spec.on_reduce("Start", |_, _| Decision::Override(CounterState::counter(0, true)))
                // Accepted so taps see them, but counting needs Start first.
                .ignore("Increment")
                .ignore("Decrement")
        })
        .in_state("Counter", move |spec| {
            spec.on_reduce("Increment", |_, state| {
                update(state, |counter, enabled| (counter.saturating_add(1), enabled))
            })
            .on_reduce("Decrement", |_, state| {
                update(state, |counter, enabled| (counter.saturating_sub(1), enabled))
            })
            .on_reduce("Reset", |_, _| Decision::Override(CounterState::Uninitialized))
            .on_reduce("Disable", |_, state| {
                update(state, |counter, _| (counter, false))
            })
            .on("Enable", move |_, state| async move {
                debug!(delay_ms = enable_delay.as_millis() as u64, "re-enabling counter after delay");
                tokio::time::sleep(enable_delay).await;
                Ok(update(&state, |counter, _| (counter, true)))
            })
        })
}

pub fn definition(
    config: &CounterConfig,
    runtime: &RuntimeConfig,
) -> Result<MachineDefinition<CounterState, CounterAction>, BuildError> {
    builder(config, runtime).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_copies_counter_payload() {
        let state = CounterState::counter(4, true);
        assert_eq!(
            update(&state, |counter, enabled| (counter * 2, !enabled)),
            Decision::Mutate(CounterState::counter(8, false))
        );
        assert_eq!(
            update(&CounterState::Uninitialized, |counter, enabled| (counter, enabled)),
            Decision::NoChange
        );
    }

    #[test]
    fn uninitialized_accepts_only_start_as_a_transition() {
        let definition = definition(&CounterConfig::default(), &RuntimeConfig::default()).unwrap();
        let table = definition.table();

        assert!(table.handles("Uninitialized", "Start"));
        assert!(table.handles("Uninitialized", "Increment"));
        assert!(!table.handles("Uninitialized", "Reset"));
        assert!(!table.handles("Counter", "Start"));
        assert!(table.handles("Counter", "Enable"));
    }

    #[tokio::test(start_paused = true)]
    async fn counting_saturates_at_the_bounds() {
        use std::time::Duration;
        use tokio::time::timeout;

        let definition = definition(&CounterConfig::default(), &RuntimeConfig::default()).unwrap();
        let (top, mut top_states) = {
            let machine = definition.start_with(CounterState::counter(i64::MAX, true)).unwrap();
            let states = machine.subscribe();
            (machine, states)
        };
        let bottom = definition.start_with(CounterState::counter(i64::MIN, true)).unwrap();
        let mut bottom_states = bottom.subscribe();

        top.dispatch(CounterAction::Increment).unwrap();
        top.dispatch(CounterAction::Decrement).unwrap();
        bottom.dispatch(CounterAction::Decrement).unwrap();
        bottom.dispatch(CounterAction::Increment).unwrap();

        assert_eq!(top_states.next().await, Some(CounterState::counter(i64::MAX, true)));
        assert_eq!(
            timeout(Duration::from_secs(5), top_states.next()).await.unwrap(),
            Some(CounterState::counter(i64::MAX - 1, true))
        );
        assert_eq!(bottom_states.next().await, Some(CounterState::counter(i64::MIN, true)));
        assert_eq!(
            timeout(Duration::from_secs(5), bottom_states.next()).await.unwrap(),
            Some(CounterState::counter(i64::MIN + 1, true))
        );
        assert!(top.status().is_running());
        assert!(bottom.status().is_running());
    }
}
