//! Shared rendering utilities.
//!
//! Cursor positioning, width-aware padding and truncation, and fuzzy match
//! highlighting. Widths are counted in characters, never bytes, because
//! titles and queries come from users.

use crate::ui::theme::Theme;

/// Positions the cursor at a 1-indexed row and column.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Returns `text` centered in `cols` columns, padded on both sides.
///
/// Text wider than `cols` is cut. When padding cannot split evenly the right
/// side gets the extra space.
///
/// ```rust
/// use zgallery::ui::helpers::centered;
///
/// assert_eq!(centered("ab", 6), "  ab  ");
/// assert_eq!(centered("abcdef", 3), "abc");
/// ```
#[must_use]
pub fn centered(text: &str, cols: usize) -> String {
    let visible: String = text.chars().take(cols).collect();
    let len = visible.chars().count();
    let left = (cols - len) / 2;
    format!(
        "{}{visible}{}",
        " ".repeat(left),
        " ".repeat(cols - len - left)
    )
}

/// Cuts `text` to `max` characters, ending in "..." when shortened.
///
/// ```rust
/// use zgallery::ui::helpers::truncate_end;
///
/// assert_eq!(truncate_end("a very long title", 10), "a very ...");
/// assert_eq!(truncate_end("short", 10), "short");
/// ```
#[must_use]
pub fn truncate_end(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Cuts `text` to `max` characters from the front, starting with "...".
///
/// Used for URLs and the query, where the end is the informative part.
///
/// ```rust
/// use zgallery::ui::helpers::truncate_start;
///
/// assert_eq!(truncate_start("https://i.x.test/abch.jpg", 12), ".../abch.jpg");
/// ```
#[must_use]
pub fn truncate_start(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let tail: String = text.chars().skip(len - keep).collect();
    format!("...{tail}")
}

/// Prints `text` with the character ranges in `ranges` highlighted.
///
/// Ranges are `(start, end)` character indices with an exclusive end, sorted
/// and non-overlapping. Ranges reaching past the text are clamped.
///
/// Selected rows print plainly so the highlight colors never fight with the
/// selection background.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
