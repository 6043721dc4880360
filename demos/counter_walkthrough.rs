//! Drives the counter screen the way a UI would and prints each snapshot.
//!
//! Run with `cargo run --example counter_walkthrough`. Set `RUST_LOG=debug`
//! to see the runtime's transition spans, or `REFLOW_LOG_FORMAT=json` for
//! machine-readable logs.

use reflow::config::ReflowConfig;
use reflow::logging;
use reflow::machines::{activity, counter, ActivityAction, CounterAction, WindowWidthSizeClass};
use reflow::viewmodel::CounterViewModel;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_default();
    let config = ReflowConfig::load()?;

    let activity = activity::definition(&config.runtime)?.start()?;
    let counter = counter::definition(&config.counter, &config.runtime)?.start()?;
    let view_model = CounterViewModel::new(activity, counter);

    let mut ui = view_model.watch();
    let printer = tokio::spawn(async move {
        while ui.changed().await.is_ok() {
            let snapshot = ui.borrow_and_update().clone();
            println!("{}", serde_json::to_string(&snapshot).unwrap_or_default());
        }
    });

    view_model.dispatch_activity(ActivityAction::WindowSizeChanged(
        WindowWidthSizeClass::from_width_dp(412.0),
    ))?;

    let script = [
        CounterAction::Increment,
        CounterAction::Start,
        CounterAction::Increment,
        CounterAction::Increment,
        CounterAction::Disable,
        CounterAction::Decrement,
        CounterAction::Enable,
        CounterAction::Reset,
    ];
    for action in script {
        println!("> {action:?}");
        view_model.dispatch(action)?;
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    // Let the delayed Enable and the Reset behind it land.
    tokio::time::sleep(config.counter.enable_delay() + Duration::from_millis(200)).await;
    drop(view_model);
    printer.abort();
    Ok(())
}
