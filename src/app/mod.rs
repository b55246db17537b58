//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (main.rs) and the search core. Keys,
//! timer ticks, web responses and worker responses come in as [`Event`]s;
//! host calls go out as [`Action`]s.
//!
//! ```text
//! User Input ─┐
//! Timer Tick ─┼→ Events → handle_event → State Mutations → Actions → Side Effects
//! Web Reply ──┤                 ↑                                      ↓
//!             └──────── Worker Responses ◄─────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Input and view mode types
//! - [`state`]: Central application state and view model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, ViewMode};
pub use state::{AppState, ERROR_NOTICE, MIN_QUERY_CHARS};
