//! Search bar component renderer.
//!
//! Renders the query input as a bordered box with a block cursor while the
//! input has focus.

use crate::ui::helpers::{position_cursor, truncate_start};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 5;

const PROMPT: &str = " Search: ";
const CURSOR: char = '█';

/// Renders the search input box at the specified row.
///
/// ```text
/// [margin] ┌──────────────────┐ [margin]
/// [margin] │ Search: puppies█ │ [margin]
/// [margin] └──────────────────┘ [margin]
/// ```
///
/// Borders use `search_bar_border` when focused and `border` otherwise, so
/// the user can tell whether keys go to the query or to the list. A query
/// longer than the box keeps its end visible.
///
/// # Returns
///
/// The next available row position (row + 3)
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = if search.is_focused {
        &theme.colors.search_bar_border
    } else {
        &theme.colors.border
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border));
    print!("┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let cursor_width = usize::from(search.is_focused);
    let query_width = inner_width.saturating_sub(PROMPT.len() + cursor_width);
    let query = truncate_start(&search.query, query_width);
    let used = PROMPT.len() + query.chars().count() + cursor_width;

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{PROMPT}{query}");
    if search.is_focused {
        print!("{CURSOR}");
    }
    print!("{}", " ".repeat(inner_width.saturating_sub(used)));
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}
