//! Window width size class of the hosting activity.

use crate::builder::{BuildError, StateMachineBuilder};
use crate::config::RuntimeConfig;
use crate::core::Decision;
use crate::effects::MachineDefinition;
use serde::{Deserialize, Serialize};

pub const LABEL: &str = "activity";

/// Width buckets used to pick a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowWidthSizeClass {
    Compact,
    Medium,
    Expanded,
}

impl WindowWidthSizeClass {
    /// Classify a window width given in density-independent pixels.
    pub fn from_width_dp(width: f32) -> Self {
        if width < 600.0 {
            Self::Compact
        } else if width < 840.0 {
            Self::Medium
        } else {
            Self::Expanded
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum ActivityState {
    Uninitialized,
    Initialized { width: WindowWidthSizeClass },
}

crate::impl_state!(ActivityState { Uninitialized, Initialized });

impl ActivityState {
    pub fn width(&self) -> Option<WindowWidthSizeClass> {
        match self {
            Self::Uninitialized => None,
            Self::Initialized { width } => Some(*width),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActivityAction {
    WindowSizeChanged(WindowWidthSizeClass),
}

crate::impl_action!(ActivityAction { WindowSizeChanged });

pub fn builder(runtime: &RuntimeConfig) -> StateMachineBuilder<ActivityState, ActivityAction> {
    StateMachineBuilder::<ActivityState, ActivityAction>::new()
        .label(LABEL)
        .initial(ActivityState::Uninitialized)
        .runtime(runtime.clone())
        // Stays uninitialized until the host reports a window size.
        .in_state("Uninitialized", |spec| {
            spec.on_reduce("WindowSizeChanged", |action, _| {
                let ActivityAction::WindowSizeChanged(width) = action;
                Decision::Override(ActivityState::Initialized { width: *width })
            })
        })
        .in_state("Initialized", |spec| {
            spec.on_reduce("WindowSizeChanged", |action, _| {
                let ActivityAction::WindowSizeChanged(width) = action;
                Decision::Mutate(ActivityState::Initialized { width: *width })
            })
        })
}

pub fn definition(
    runtime: &RuntimeConfig,
) -> Result<MachineDefinition<ActivityState, ActivityAction>, BuildError> {
    builder(runtime).build()
}
