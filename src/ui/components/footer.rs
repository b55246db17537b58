//! Footer component renderer.
//!
//! The footer shows keybinding hints, or the network error notice while one
//! is pending.

use crate::ui::helpers::{centered, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer line at the specified row.
///
/// A notice is drawn bold in the theme's `error_fg` color and hides the
/// keybinding hints until the next edit or search clears it. Otherwise the
/// hints are drawn dimmed. Both are centered and cut to the pane width.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    if let Some(notice) = &footer.notice {
        print!("{}", Theme::bold());
        print!("{}", Theme::fg(&theme.colors.error_fg));
        print!("{}", centered(notice, cols));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{}", centered(&footer.keybindings, cols));
    }

    print!("{}", Theme::reset());
    row + 1
}
