//! Sample machines driven through their public handles.

use reflow::config::{CounterConfig, RuntimeConfig};
use reflow::machines::{
    activity, counter, ActivityAction, ActivityState, CounterAction, CounterState,
    WindowWidthSizeClass,
};
use reflow::tap::FnTap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{timeout, Instant};

const QUIET: Duration = Duration::from_secs(5);

fn started_counter() -> (
    reflow::StateMachine<CounterState, CounterAction>,
    reflow::StateSubscription<CounterState>,
) {
    counter::definition(&CounterConfig::default(), &RuntimeConfig::default())
        .unwrap()
        .start_subscribed()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn counter_starts_uninitialized_and_ignores_counting() {
    let (machine, mut states) = started_counter();
    assert_eq!(states.next().await, Some(CounterState::Uninitialized));

    machine.dispatch(CounterAction::Increment).unwrap();
    machine.dispatch(CounterAction::Decrement).unwrap();
    machine.dispatch(CounterAction::Reset).unwrap();
    assert!(timeout(QUIET, states.next()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn counter_increments_and_decrements() {
    let (machine, mut states) = started_counter();
    states.next().await;

    machine.dispatch(CounterAction::Start).unwrap();
    assert_eq!(states.next().await, Some(CounterState::counter(0, true)));

    machine.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(states.next().await, Some(CounterState::counter(1, true)));

    machine.dispatch(CounterAction::Decrement).unwrap();
    machine.dispatch(CounterAction::Decrement).unwrap();
    assert_eq!(states.next().await, Some(CounterState::counter(0, true)));
    assert_eq!(states.next().await, Some(CounterState::counter(-1, true)));
}

#[tokio::test(start_paused = true)]
async fn disabled_counter_still_counts() {
    let (machine, mut states) = started_counter();
    states.next().await;
    machine.dispatch(CounterAction::Start).unwrap();
    states.next().await;

    machine.dispatch(CounterAction::Disable).unwrap();
    machine.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(states.next().await, Some(CounterState::counter(0, false)));
    assert_eq!(states.next().await, Some(CounterState::counter(1, false)));
}

#[tokio::test(start_paused = true)]
async fn enable_waits_for_the_configured_delay() {
    let (machine, mut states) = started_counter();
    states.next().await;
    machine.dispatch(CounterAction::Start).unwrap();
    states.next().await;
    machine.dispatch(CounterAction::Disable).unwrap();
    states.next().await;

    let started = Instant::now();
    machine.dispatch(CounterAction::Enable).unwrap();
    // Queued behind the delayed Enable.
    machine.dispatch(CounterAction::Increment).unwrap();

    assert_eq!(states.next().await, Some(CounterState::counter(0, true)));
    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert_eq!(states.next().await, Some(CounterState::counter(1, true)));
}

#[tokio::test(start_paused = true)]
async fn reset_returns_to_uninitialized() {
    let (machine, mut states) = started_counter();
    states.next().await;
    machine.dispatch(CounterAction::Start).unwrap();
    machine.dispatch(CounterAction::Increment).unwrap();
    machine.dispatch(CounterAction::Reset).unwrap();

    assert_eq!(states.next().await, Some(CounterState::counter(0, true)));
    assert_eq!(states.next().await, Some(CounterState::counter(1, true)));
    assert_eq!(states.next().await, Some(CounterState::Uninitialized));

    let path: Vec<_> = machine.history().get_path().into_iter().cloned().collect();
    assert_eq!(
        path,
        vec![
            CounterState::Uninitialized,
            CounterState::counter(0, true),
            CounterState::counter(1, true),
            CounterState::Uninitialized,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn repeated_no_op_actions_publish_nothing() {
    let (machine, mut states) = started_counter();
    states.next().await;
    machine.dispatch(CounterAction::Start).unwrap();
    states.next().await;

    machine.dispatch(CounterAction::Enable).unwrap();
    machine.dispatch(CounterAction::Start).unwrap();
    machine.dispatch(CounterAction::Enable).unwrap();
    assert!(timeout(QUIET, states.next()).await.is_err());
    assert_eq!(machine.history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn counter_taps_see_every_handled_action() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let (machine, mut states) =
        counter::builder(&CounterConfig::default(), &RuntimeConfig::default())
            .tap(FnTap::new(move |action: &CounterAction, state: &CounterState| {
                sink.lock().unwrap().push((*action, state.clone()));
                Ok(())
            }))
            .build()
            .unwrap()
            .start_subscribed()
            .unwrap();

    states.next().await;
    machine.dispatch(CounterAction::Increment).unwrap();
    machine.dispatch(CounterAction::Start).unwrap();
    states.next().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (CounterAction::Increment, CounterState::Uninitialized),
            (CounterAction::Start, CounterState::counter(0, true)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn activity_tracks_window_size_class() {
    let (machine, mut states) = activity::definition(&RuntimeConfig::default())
        .unwrap()
        .start_subscribed()
        .unwrap();
    assert_eq!(states.next().await, Some(ActivityState::Uninitialized));

    machine
        .dispatch(ActivityAction::WindowSizeChanged(WindowWidthSizeClass::Compact))
        .unwrap();
    assert_eq!(
        states.next().await,
        Some(ActivityState::Initialized {
            width: WindowWidthSizeClass::Compact
        })
    );

    machine
        .dispatch(ActivityAction::WindowSizeChanged(WindowWidthSizeClass::Compact))
        .unwrap();
    machine
        .dispatch(ActivityAction::WindowSizeChanged(WindowWidthSizeClass::Medium))
        .unwrap();
    assert_eq!(
        states.next().await,
        Some(ActivityState::Initialized {
            width: WindowWidthSizeClass::Medium
        })
    );
}

#[tokio::test(start_paused = true)]
async fn late_subscribers_replay_the_latest_snapshot() {
    let (machine, mut states) = started_counter();
    states.next().await;
    machine.dispatch(CounterAction::Start).unwrap();
    machine.dispatch(CounterAction::Increment).unwrap();
    states.next().await;
    states.next().await;

    let mut late = machine.subscribe();
    assert_eq!(late.next().await, Some(CounterState::counter(1, true)));
    assert!(timeout(QUIET, late.next()).await.is_err());
}
