//! Builder API for declaring machines.
//!
//! A machine is declared as one `in_state` block per state variant. Inside a
//! block, handlers are registered for the enter trigger, for individual
//! actions, and for continuous sources. `build()` validates every
//! registration at once and freezes the result into a
//! [`MachineDefinition`](crate::effects::MachineDefinition).
//!
//! # Example
//!
//! ```
//! use reflow::builder::StateMachineBuilder;
//! use reflow::core::Decision;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! enum Door {
//!     Closed,
//!     Open,
//! }
//! reflow::impl_state!(Door { Closed, Open });
//!
//! #[derive(Clone, Debug)]
//! enum Push {
//!     Push,
//! }
//! reflow::impl_action!(Push { Push });
//!
//! let definition = StateMachineBuilder::<Door, Push>::new()
//!     .label("door")
//!     .initial(Door::Closed)
//!     .in_state("Closed", |spec| {
//!         spec.on_reduce("Push", |_, _| Decision::Override(Door::Open))
//!     })
//!     .in_state("Open", |spec| {
//!         spec.on_reduce("Push", |_, _| Decision::Override(Door::Closed))
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert!(definition.table().handles("Open", "Push"));
//! ```

pub mod error;
pub mod machine;
pub mod macros;
pub mod state;

pub use error::{BuildError, RegistrationError};
pub use machine::StateMachineBuilder;
pub use state::InStateBuilder;
