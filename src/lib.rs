//! Reflow: declarative, reactive state machines
//!
//! Reflow keeps a small pure core (states, actions, decisions, history) apart
//! from the imperative shell that runs it (one worker task per machine,
//! replayable state subscriptions, fire-and-forget taps).
//!
//! # Core Concepts
//!
//! - **State / Action**: closed enums, identified by variant name
//! - **Decision**: a handler's outcome: no change, mutate, or override
//! - **Table**: handlers per state variant, keyed by action or enter trigger,
//!   plus continuous sources that live only while the variant is current
//! - **Subscription**: latest snapshot first, then every publication in order
//!
//! # Example
//!
//! ```rust
//! use reflow::builder::StateMachineBuilder;
//! use reflow::core::Decision;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! enum Light {
//!     Off,
//!     On { brightness: u8 },
//! }
//! reflow::impl_state!(Light { Off, On });
//!
//! #[derive(Clone, Debug)]
//! enum Switch {
//!     Toggle,
//!     Dim,
//! }
//! reflow::impl_action!(Switch { Toggle, Dim });
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let definition = StateMachineBuilder::<Light, Switch>::new()
//!     .label("light")
//!     .initial(Light::Off)
//!     .in_state("Off", |spec| {
//!         spec.on_reduce("Toggle", |_, _| Decision::Override(Light::On { brightness: 100 }))
//!     })
//!     .in_state("On", |spec| {
//!         spec.on_reduce("Toggle", |_, _| Decision::Override(Light::Off))
//!             .on_reduce("Dim", |_, state| match state {
//!                 Light::On { brightness } => Decision::Mutate(Light::On {
//!                     brightness: brightness / 2,
//!                 }),
//!                 Light::Off => Decision::NoChange,
//!             })
//!     })
//!     .build()
//!     .unwrap();
//!
//! let (light, mut states) = definition.start_subscribed().unwrap();
//! light.dispatch(Switch::Toggle).unwrap();
//! light.dispatch(Switch::Dim).unwrap();
//!
//! assert_eq!(states.next().await, Some(Light::Off));
//! assert_eq!(states.next().await, Some(Light::On { brightness: 100 }));
//! assert_eq!(states.next().await, Some(Light::On { brightness: 50 }));
//! # }
//! ```

pub mod builder;
pub mod collaborators;
pub mod config;
pub mod core;
pub mod effects;
pub mod error;
pub mod logging;
pub mod machines;
pub mod tap;
pub mod viewmodel;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use config::ReflowConfig;
pub use core::{Action, Decision, State, StateHistory, Trigger};
pub use effects::{MachineDefinition, MachineStatus, StateMachine, StateSubscription};
pub use error::{Error, Result};
pub use tap::{FnTap, LogTap, TransitionTap};
