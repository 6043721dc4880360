//! View models combining machine streams into UI snapshots.
//!
//! A view model owns the machines behind one screen, keeps their latest
//! states together in a single snapshot published through a
//! `tokio::sync::watch` channel, and forwards user intents as actions.

mod counter;
mod news_search;

pub use counter::{CounterUiState, CounterViewModel};
pub use news_search::{NewsSearchUiState, NewsSearchViewModel};

use crate::core::State;
use crate::effects::StateSubscription;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Fold two state subscriptions into one watched snapshot.
///
/// The task ends once both subscriptions have ended or every receiver is
/// gone.
pub(crate) fn combine<Ui, A, B>(
    mut left: StateSubscription<A>,
    mut right: StateSubscription<B>,
    initial: Ui,
    on_left: fn(&mut Ui, A),
    on_right: fn(&mut Ui, B),
) -> (watch::Receiver<Ui>, JoinHandle<()>)
where
    Ui: Clone + PartialEq + Send + Sync + 'static,
    A: State,
    B: State,
{
    let (sender, receiver) = watch::channel(initial);
    let task = tokio::spawn(async move {
        let mut left_open = true;
        let mut right_open = true;
        while left_open || right_open {
            tokio::select! {
                state = left.next(), if left_open => match state {
                    Some(state) => {
                        sender.send_if_modified(|ui| update(ui, state, on_left));
                    }
                    None => left_open = false,
                },
                state = right.next(), if right_open => match state {
                    Some(state) => {
                        sender.send_if_modified(|ui| update(ui, state, on_right));
                    }
                    None => right_open = false,
                },
            }
            if sender.is_closed() {
                break;
            }
        }
        trace!("view model sources ended");
    });
    (receiver, task)
}

fn update<Ui: Clone + PartialEq, T>(ui: &mut Ui, state: T, apply: fn(&mut Ui, T)) -> bool {
    let before = ui.clone();
    apply(ui, state);
    *ui != before
}
