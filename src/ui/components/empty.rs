//! Empty state component renderer.
//!
//! Drawn in place of the result table when there is nothing to list: the
//! query is too short, a search is pending, the search failed, or it found
//! nothing.

use crate::ui::helpers::{centered, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Blank lines between the top of the table area and the message.
const TOP_GAP: usize = 2;

/// Renders the two-line empty state below `row`.
///
/// ```text
/// [TOP_GAP blank lines]
/// [left padding] MESSAGE [right padding]
/// [left padding] subtitle [right padding]
/// ```
///
/// The message uses `empty_state_fg`; the subtitle is dimmed `text_dim`.
///
/// # Returns
///
/// The row after the subtitle.
pub fn render_empty_state(row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    let message_row = row + TOP_GAP;

    position_cursor(message_row, 1);
    print!("{}", Theme::fg(&theme.colors.empty_state_fg));
    print!("{}", centered(&empty.message, cols));
    print!("{}", Theme::reset());

    position_cursor(message_row + 1, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", centered(&empty.subtitle, cols));
    print!("{}", Theme::reset());

    message_row + 2
}
