//! Sample machines built on the library.
//!
//! Each module exposes its state and action enums, a `builder` returning the
//! unbuilt [`StateMachineBuilder`](crate::builder::StateMachineBuilder) (so
//! callers can add taps), and a `definition` shortcut.

pub mod activity;
pub mod app;
pub mod counter;
pub mod news_search;

pub use activity::{ActivityAction, ActivityState, WindowWidthSizeClass};
pub use app::{AppAction, AppState};
pub use counter::{CounterAction, CounterState};
pub use news_search::{SearchAction, SearchState};
