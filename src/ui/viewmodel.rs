//! View model types for UI rendering.
//!
//! Plain data computed by [`crate::app::AppState::compute_viewmodel`]. The
//! renderer only reads these types and never touches application state, so
//! layout decisions can be tested without a terminal.

/// Complete renderable state for one frame.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Rows inside the visible window, in display order.
    pub display_items: Vec<DisplayRow>,

    /// Selected row relative to the start of `display_items`.
    pub selected_index: usize,

    pub header: HeaderInfo,

    pub footer: FooterInfo,

    /// Replaces the table when there is nothing to list.
    pub empty_state: Option<EmptyState>,

    /// Present in the list view.
    pub search_bar: Option<SearchBarInfo>,

    /// Present in the detail view.
    pub detail: Option<DetailInfo>,
}

/// One line of the result table.
#[derive(Debug, Clone)]
pub enum DisplayRow {
    Item(DisplayItem),
    /// Trailing "loading more" row while the next page is in flight.
    Loading,
}

/// A formatted result row.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    /// Title, already truncated to the title column.
    pub title: String,

    /// "image" or "other".
    pub kind: String,

    /// Thumbnail URL, truncated from the front to fit.
    pub thumbnail: String,

    pub is_selected: bool,

    /// Character ranges `(start, end)` of `title` matching the search term.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct FooterInfo {
    pub keybindings: String,

    /// Shown instead of the keybindings when set.
    pub notice: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,

    pub subtitle: String,
}

#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    pub query: String,

    /// Draws the input cursor when the query has focus.
    pub is_focused: bool,
}

/// Full description of the selected result.
#[derive(Debug, Clone)]
pub struct DetailInfo {
    /// "n of m" position in the loaded results.
    pub position: String,
    pub title: String,
    pub kind: String,
    pub source_url: String,
    pub thumbnail_url: String,
}
