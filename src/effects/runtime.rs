//! The per-machine worker.
//!
//! One task per machine pulls triggers strictly one at a time: a pending
//! enter trigger first, then whichever of the mailbox or the active
//! continuous sources is ready. A handler body is awaited inline, so while it
//! is suspended nothing else for this machine runs.

use crate::core::{Action, Decision, State, Trigger};
use crate::effects::handler::{HandlerError, Reduction};
use crate::effects::machine::MachineId;
use crate::effects::stream::{MachineStatus, StateCell};
use crate::effects::table::TransitionTable;
use crate::tap::{self, TransitionTap};
use futures::stream::{BoxStream, SelectAll, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, debug_span, error, trace, warn, Instrument};

enum Work<S: State, A: Action> {
    Enter,
    Action(A),
    Collected(Reduction<S>),
}

pub(crate) struct MachineRuntime<S: State, A: Action> {
    id: MachineId,
    label: &'static str,
    table: Arc<TransitionTable<S, A>>,
    taps: Vec<Arc<dyn TransitionTap<S, A>>>,
    cell: Arc<StateCell<S>>,
    mailbox: mpsc::UnboundedReceiver<A>,
    enter_pending: bool,
    subscriptions: SelectAll<BoxStream<'static, Reduction<S>>>,
}

impl<S: State, A: Action> MachineRuntime<S, A> {
    pub(crate) fn new(
        id: MachineId,
        label: &'static str,
        table: Arc<TransitionTable<S, A>>,
        taps: Vec<Arc<dyn TransitionTap<S, A>>>,
        cell: Arc<StateCell<S>>,
        mailbox: mpsc::UnboundedReceiver<A>,
    ) -> Self {
        Self {
            id,
            label,
            table,
            taps,
            cell,
            mailbox,
            enter_pending: false,
            subscriptions: SelectAll::new(),
        }
    }

    pub(crate) async fn run(mut self) {
        let initial = self.cell.current();
        debug!(machine = %self.id, label = self.label, state = initial.name(), "machine started");
        self.enter(&initial);

        let outcome = loop {
            let work = if std::mem::take(&mut self.enter_pending) {
                Work::Enter
            } else {
                tokio::select! {
                    action = self.mailbox.recv() => match action {
                        Some(action) => Work::Action(action),
                        None => break Ok(()),
                    },
                    Some(reduction) = self.subscriptions.next(), if !self.subscriptions.is_empty() => {
                        Work::Collected(reduction)
                    }
                }
            };

            if let Err(err) = self.process(work).await {
                break Err(err);
            }
        };

        match outcome {
            Ok(()) => {
                debug!(machine = %self.id, label = self.label, "mailbox closed; machine stopped");
                self.cell.close(MachineStatus::Stopped);
            }
            Err(err) => {
                error!(
                    machine = %self.id,
                    label = self.label,
                    state = self.cell.current().name(),
                    error = %err,
                    "handler error escaped; machine stopped"
                );
                self.cell.close(MachineStatus::Failed(err.message().to_string()));
            }
        }
    }

    async fn process(&mut self, work: Work<S, A>) -> Result<(), HandlerError> {
        let current = self.cell.current();
        let variant = current.name();

        let (trigger, decision, applied) = match work {
            Work::Enter => {
                let Some(handler) = self.table.enter_handler(variant).cloned() else {
                    return Ok(());
                };
                let span = self.span(variant, Trigger::Enter);
                let decision = handler(current.clone()).instrument(span).await?;
                (Trigger::Enter, decision, None)
            }
            Work::Action(action) => {
                let trigger = Trigger::Action(action.name());
                let Some(handler) = self.table.action_handler(variant, action.name()).cloned() else {
                    trace!(
                        machine = %self.id,
                        state = variant,
                        action = action.name(),
                        "no handler for action in this state; dropped"
                    );
                    return Ok(());
                };
                let span = self.span(variant, trigger);
                let decision = handler(action.clone(), current.clone()).instrument(span).await?;
                (trigger, decision, Some(action))
            }
            Work::Collected(reduction) => {
                let span = self.span(variant, Trigger::Collected);
                let decision = reduction(current.clone()).instrument(span).await?;
                (Trigger::Collected, decision, None)
            }
        };

        self.apply(&current, trigger, decision);

        if let Some(action) = applied {
            if !self.taps.is_empty() {
                tap::notify(&self.taps, &action, &self.cell.current());
            }
        }
        Ok(())
    }

    fn apply(&mut self, current: &S, trigger: Trigger, decision: Decision<S>) {
        if decision.is_misdeclared_mutate(current) {
            warn!(
                machine = %self.id,
                state = current.name(),
                %trigger,
                "mutate decision changed state variant; applying as override"
            );
        }

        let Some(next) = decision.resolve(current) else {
            trace!(machine = %self.id, state = current.name(), %trigger, "no change");
            return;
        };

        let changed_variant = !next.same_variant(current);
        let sequence = self.cell.publish(next.clone(), trigger);
        debug!(
            machine = %self.id,
            sequence,
            from = current.name(),
            to = next.name(),
            %trigger,
            "state published"
        );

        if changed_variant {
            let dropped = self.subscriptions.len();
            // Dropping the streams cancels every source of the variant being left.
            self.subscriptions = SelectAll::new();
            if dropped > 0 {
                debug!(machine = %self.id, from = current.name(), dropped, "continuous sources cancelled");
            }
            self.enter(&next);
        }
    }

    /// Queue the enter trigger and start continuous sources for `state`.
    fn enter(&mut self, state: &S) {
        self.enter_pending = true;
        for collector in self.table.collectors(state.name()) {
            self.subscriptions.push(collector(state.clone()));
        }
    }

    fn span(&self, variant: &'static str, trigger: Trigger) -> tracing::Span {
        debug_span!("transition", machine = %self.id, label = self.label, state = variant, %trigger)
    }
}
