//! Gallery colour palettes and the 24-bit ANSI escapes built from them.
//!
//! Four Catppuccin flavours ship inside the binary (`catppuccin-mocha` is the
//! default, plus `-latte`, `-frappe` and `-macchiato`); `theme_file` points
//! at a custom palette:
//!
//! ```toml
//! name = "gallery-dark"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! kind_fg = "#94e2d5"
//! placeholder_fg = "#6c7086"
//! error_fg = "#f38ba8"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{GalleryError, Result};

const DEFAULT_THEME: &str = "catppuccin-mocha";
const WHITE: (u8, u8, u8) = (255, 255, 255);

/// A named palette.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colours (`#rrggbb`) for each screen element.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Highlighted result row.
    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer hints and URLs.
    pub text_dim: String,

    pub border: String,

    /// Search bar border color while the query has focus.
    pub search_bar_border: String,
    /// Committed term inside result titles.
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// KIND column color.
    pub kind_fg: String,

    /// "Loading more" row color.
    pub placeholder_fg: String,

    /// Network error notice color.
    pub error_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name, or `None` if the name is unknown.
    ///
    /// ```rust
    /// use zgallery::ui::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let source = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        toml::from_str(source).ok()
    }

    /// Reads a palette from disk.
    ///
    /// # Errors
    ///
    /// [`GalleryError::Theme`] when the file cannot be read or is not a
    /// complete theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| GalleryError::Theme(format!("Failed to read theme file: {e}")))?;

        toml::from_str(&raw)
            .map_err(|e| GalleryError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Converts a hex color to RGB. Malformed colors become white.
    fn rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return WHITE;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// ANSI 24-bit foreground sequence for a hex color.
    ///
    /// ```rust
    /// use zgallery::ui::Theme;
    ///
    /// assert_eq!(Theme::fg("#1e1e2e"), "\u{1b}[38;2;30;30;46m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (red, green, blue) = Self::rgb(hex);
        format!("\u{1b}[38;2;{red};{green};{blue}m")
    }

    /// ANSI 24-bit background sequence for a hex color.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (red, green, blue) = Self::rgb(hex);
        format!("\u{1b}[48;2;{red};{green};{blue}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    ///
    /// # Panics
    ///
    /// Panics if the compiled-in theme fails to parse, which the tests below
    /// rule out.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).expect("compiled-in default theme parses")
    }
}
