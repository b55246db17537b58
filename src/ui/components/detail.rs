//! Detail view of a single result.

use crate::ui::helpers::{position_cursor, truncate_end, truncate_start};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailInfo;

const LABEL_WIDTH: usize = 12;
const LEFT_MARGIN: usize = 2;

/// Renders the labelled fields of `detail` starting at `row`.
///
/// Titles are cut at the end, URLs at the front, so the most telling part of
/// each stays on screen. Returns the next free row.
pub fn render_detail(row: usize, detail: &DetailInfo, theme: &Theme, cols: usize) -> usize {
    let value_width = cols.saturating_sub(LEFT_MARGIN + LABEL_WIDTH);

    let fields = [
        ("Result", detail.position.clone(), &theme.colors.text_dim),
        ("Title", truncate_end(&detail.title, value_width), &theme.colors.text_normal),
        ("Kind", detail.kind.clone(), &theme.colors.kind_fg),
        ("Source", truncate_start(&detail.source_url, value_width), &theme.colors.text_normal),
        ("Thumbnail", truncate_start(&detail.thumbnail_url, value_width), &theme.colors.text_normal),
    ];

    let mut current_row = row + 1;
    for (label, value, color) in fields {
        position_cursor(current_row, 1);
        print!("{}", " ".repeat(LEFT_MARGIN));
        print!("{}", Theme::bold());
        print!("{}", Theme::fg(&theme.colors.header_fg));
        print!("{label:<LABEL_WIDTH$}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(color));
        print!("{value}");
        print!("{}", Theme::reset());
        current_row += 1;
    }

    current_row
}
