//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event, so
//! several side effects can be queued at once. The plugin shim executes them
//! in order: web requests go to the host, timers are armed, and storage
//! messages are posted to the background worker.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use zgallery::app::Action;
//! use zgallery::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_snapshot()),
//!     Action::ScheduleTimer(Duration::from_millis(250)),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use std::time::Duration;

use crate::search::HttpRequest;
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the background worker.
    ///
    /// Used for snapshot persistence so file I/O never blocks rendering.
    PostToWorker(WorkerMessage),

    /// Issues an HTTP GET through the host.
    ///
    /// The request context carries the request id; the host echoes it back
    /// with the response so it can be routed to the right fetch.
    SendRequest(HttpRequest),

    /// Arms a one-shot timer that comes back as a tick.
    ///
    /// Ticks drive both the query debouncer and request timeouts.
    ScheduleTimer(Duration),
}
