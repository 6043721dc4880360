//! Fire-and-forget observation of applied actions.
//!
//! A tap receives every action a machine processed together with the state
//! current after the decision was applied. Taps run on their own spawned
//! task: they can neither delay nor influence the machine, and an error or a
//! panic inside a tap is logged and otherwise ignored.

use crate::core::{Action, State};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

/// Observer of (action, resulting state) pairs.
#[async_trait]
pub trait TransitionTap<S: State, A: Action>: Send + Sync + 'static {
    async fn observe(&self, action: A, state: S) -> anyhow::Result<()>;
}

/// Tap that logs each processed action at `info`.
#[derive(Clone, Debug)]
pub struct LogTap {
    label: &'static str,
}

impl LogTap {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

#[async_trait]
impl<S: State, A: Action> TransitionTap<S, A> for LogTap {
    async fn observe(&self, action: A, state: S) -> anyhow::Result<()> {
        info!(
            machine = self.label,
            action = action.name(),
            state = state.name(),
            action_detail = ?action,
            state_detail = ?state,
            "action applied"
        );
        Ok(())
    }
}

/// Tap built from a synchronous closure.
pub struct FnTap<S, A, F> {
    f: F,
    _phantom: PhantomData<fn(A, S)>,
}

impl<S, A, F> FnTap<S, A, F>
where
    S: State,
    A: Action,
    F: Fn(&A, &S) -> anyhow::Result<()> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<S, A, F> TransitionTap<S, A> for FnTap<S, A, F>
where
    S: State,
    A: Action,
    F: Fn(&A, &S) -> anyhow::Result<()> + Send + Sync + 'static,
{
    async fn observe(&self, action: A, state: S) -> anyhow::Result<()> {
        (self.f)(&action, &state)
    }
}

/// Spawn every tap for one processed action.
pub(crate) fn notify<S: State, A: Action>(taps: &[Arc<dyn TransitionTap<S, A>>], action: &A, state: &S) {
    for tap in taps {
        let tap = Arc::clone(tap);
        let action = action.clone();
        let state = state.clone();
        let span = tracing::Span::current();
        tokio::spawn(
            async move {
                if let Err(err) = tap.observe(action, state).await {
                    warn!(error = %err, "transition tap failed");
                }
            }
            .instrument(span),
        );
    }
}
