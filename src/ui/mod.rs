//! User interface rendering layer.
//!
//! State is turned into a view model, and the view model into ANSI output:
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Header, search bar, table, empty state, detail, footer
//! - [`helpers`]: Cursor positioning, truncation, match highlighting
//! - [`theme`]: Color schemes and ANSI escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{
    DetailInfo, DisplayItem, DisplayRow, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo,
    UIViewModel,
};
