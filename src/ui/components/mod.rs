//! UI component renderers.
//!
//! Each component prints one region of the screen at a given row and
//! returns the next free row, so layouts are plain sequences of calls.
//!
//! # Layouts
//!
//! List mode (`rows - 9` rows for results):
//!
//! ```text
//! (blank)
//! Header
//! ─────────
//! ┌ Search ┐
//! │ query  │
//! └────────┘
//! TITLE  KIND  THUMBNAIL
//! rows… / empty state
//! ─────────
//! Footer
//! ```
//!
//! Detail mode replaces the search bar and table with the labelled fields of
//! the selected result.

mod detail;
mod empty;
mod footer;
mod header;
mod search;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DetailInfo, UIViewModel};

use detail::render_detail;
use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use search::render_search_bar;
use table::{render_table_headers, render_table_rows};

fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

fn render_bottom(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);
}

/// Renders the search bar with either the result table or the empty state.
pub fn render_list_mode(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // Start at row 2 (skip blank line at row 1)

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }

    if let Some(empty) = &vm.empty_state {
        render_empty_state(current_row, empty, theme, cols);
    } else {
        current_row = render_table_headers(current_row, theme);
        render_table_rows(current_row, &vm.display_items, theme, cols);
    }

    render_bottom(vm, theme, cols, rows);
}

/// Renders the selected result on its own.
pub fn render_detail_mode(vm: &UIViewModel, detail: &DetailInfo, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // Start at row 2 (skip blank line at row 1)

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    render_detail(current_row, detail, theme, cols);

    render_bottom(vm, theme, cols, rows);
}
