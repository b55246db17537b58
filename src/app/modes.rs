//! Input and view mode state types for the application.
//!
//! These enums decide how key presses are interpreted and which screen is
//! drawn.
//!
//! # State Machine
//!
//! - **Browse**: keys navigate the result list; `/` moves focus to the input
//! - **Typing**: printable keys edit the query; `Enter`/`Esc` return to Browse
//!
//! The view mode is orthogonal:
//! - **List**: the paged result table
//! - **Detail**: the selected item on its own
//!
//! # Example
//!
//! ```rust
//! use zgallery::app::modes::{InputMode, ViewMode};
//!
//! let input_mode = InputMode::Typing;
//! let view_mode = ViewMode::List;
//! assert_ne!(input_mode, InputMode::Browse);
//! assert_eq!(view_mode, ViewMode::default());
//! ```

/// Current input handling mode.
///
/// Controls which keybindings are active and whether the search bar shows
/// an input cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation and command mode.
    ///
    /// Available keybindings: j/k (navigate), / (edit query), enter (details),
    /// r (retry), q (quit).
    Browse,

    /// The query input has focus.
    ///
    /// Accepts character input and backspace. Every edit is fed to the
    /// debouncer.
    #[default]
    Typing,
}

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Scrollable result table.
    #[default]
    List,

    /// Full title and URLs of the selected result.
    Detail,
}
