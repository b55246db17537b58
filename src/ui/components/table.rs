//! Table component renderer.
//!
//! Renders the result list as three columns: TITLE (with fuzzy match
//! highlighting), KIND and THUMBNAIL. A trailing placeholder row is drawn
//! while the next page loads.

use crate::ui::helpers::{self, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayItem, DisplayRow};

const TITLE_WIDTH: usize = 42;
const KIND_WIDTH: usize = 8;

const LOADING_TEXT: &str = "Loading more…";

/// Renders the column headers. Returns the next free row.
pub fn render_table_headers(row: usize, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{:<TITLE_WIDTH$}{:<KIND_WIDTH$}{}", "TITLE", "KIND", "THUMBNAIL");
    print!("{}", Theme::reset());
    row + 1
}

/// Renders every row of the window starting at `row`.
///
/// # Returns
///
/// The next available row position (row + number of rows)
pub fn render_table_rows(row: usize, items: &[DisplayRow], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = match item {
            DisplayRow::Item(item) => render_table_row(current_row, item, theme, cols),
            DisplayRow::Loading => render_loading_row(current_row, theme, cols),
        };
    }
    current_row
}

/// Renders one result.
///
/// # Layout
///
/// ```text
/// TITLE (42 cols) KIND (8 cols) THUMBNAIL (rest) [padding to fill line]
/// ```
///
/// # Styling Precedence
///
/// 1. Selection colors for the whole row (if `is_selected`)
/// 2. Fuzzy match highlights in the title (unless selected)
/// 3. `kind_fg` for the kind column, `text_dim` for the URL
///
/// The row is padded to the full width so the selection background covers
/// the whole line.
fn render_table_row(row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    if item.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }

    helpers::render_highlighted_text(
        &item.title,
        &item.highlight_ranges,
        theme,
        item.is_selected,
    );
    let title_len = item.title.chars().count();
    print!("{}", " ".repeat(TITLE_WIDTH.saturating_sub(title_len)));

    if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.kind_fg));
    }
    print!("{:<KIND_WIDTH$}", item.kind);

    if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{}", item.thumbnail);

    let line_len = TITLE_WIDTH.max(title_len) + KIND_WIDTH.max(item.kind.len()) + item.thumbnail.chars().count();
    print!("{}", " ".repeat(cols.saturating_sub(line_len)));

    print!("{}", Theme::reset());
    row + 1
}

fn render_loading_row(row: usize, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.placeholder_fg));
    print!("{}", helpers::centered(LOADING_TEXT, cols));
    print!("{}", Theme::reset());
    row + 1
}
