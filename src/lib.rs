//! zgallery: a Zellij plugin that searches a remote image gallery as you type.
//!
//! - Debounced incremental search: a query is sent once typing pauses
//! - Paged results with infinite scrolling and a "loading more" row
//! - Responses for outdated queries never reach the displayed list
//! - The last search and its depth survive plugin restarts
//! - Spans exported as OTLP JSON for offline inspection

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, action dispatching               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Search Core   │   │ UI Layer      │   │ Worker Layer  │
//! │ (search/)     │   │ (ui/)         │   │ (worker/)     │
//! │ - Debouncer   │   │ - Rendering   │   │ - Snapshot IO │
//! │ - Session     │   │ - Theming     │   │ - IPC bridge  │
//! │ - Orchestrator│   │ - Components  │   │               │
//! │ - Gateway     │   └───────────────┘   └───────────────┘
//! │ - Cache       │                               │
//! └───────────────┘                     ┌───────────────┐
//!                                       │ Storage (JSON)│
//!                                       └───────────────┘
//!         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure & Observability Layers      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Read from the plugin block of the Zellij layout:
//!
//! ```kdl
//! plugin location="file:~/.config/zellij/plugins/zgallery.wasm" {
//!     client_id "0123456789abcde"
//!     debounce_ms "300"
//!     theme "catppuccin-mocha"
//! }
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod search;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, InputMode, ViewMode};
pub use domain::{GalleryError, NetworkError, Result};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::time::Duration;

use search::{QueryDebouncer, RemoteGateway, SearchSession, DEFAULT_API_BASE_URL};

const DEFAULT_DEBOUNCE_MS: u64 = 250;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Plugin configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the gallery API.
    pub api_base_url: String,
    /// Sent as `Authorization: Client-ID <id>` when set.
    pub client_id: Option<String>,
    /// Quiet period before a typed query is sent.
    pub debounce_ms: u64,
    /// How long an unanswered page request is waited for.
    pub request_timeout_secs: u64,
    /// Built-in theme name.
    pub theme_name: Option<String>,
    /// Path to a custom theme TOML file; wins over `theme_name`.
    pub theme_file: Option<String>,
    /// `tracing` filter directive, `info` when unset.
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            client_id: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses the Zellij plugin configuration map.
    ///
    /// Missing keys, blank values and unparsable numbers fall back to the
    /// defaults. A zero timeout or quiet period is treated as unparsable.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use zgallery::Config;
    ///
    /// let mut raw = BTreeMap::new();
    /// raw.insert("debounce_ms".to_string(), "400".to_string());
    /// raw.insert("request_timeout_secs".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_zellij(&raw);
    /// assert_eq!(config.debounce_ms, 400);
    /// assert_eq!(config.request_timeout_secs, 15);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let number = |key: &str, default: u64| {
            text(key)
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(default)
        };

        Self {
            api_base_url: text("api_base_url").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            client_id: text("client_id"),
            debounce_ms: number("debounce_ms", DEFAULT_DEBOUNCE_MS),
            request_timeout_secs: number("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS),
            theme_name: text("theme"),
            theme_file: text("theme_file"),
            trace_level: text("trace_level"),
        }
    }

    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolves the configured theme, falling back to the default theme
    /// when the file or name cannot be loaded.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            let path = infrastructure::expand_tilde(theme_file);
            return Theme::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %path, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Builds the application state for `config`.
///
/// # Errors
///
/// [`GalleryError::Config`] when `api_base_url` is not a usable base URL.
///
/// ```rust
/// use zgallery::{initialize, Config};
///
/// let state = initialize(&Config::default())?;
/// assert!(state.query.is_empty());
///
/// let broken = Config { api_base_url: "not a url".to_string(), ..Config::default() };
/// assert!(initialize(&broken).is_err());
/// # Ok::<(), zgallery::GalleryError>(())
/// ```
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!(api_base_url = %config.api_base_url, "initializing zgallery plugin");

    let gateway = RemoteGateway::new(&config.api_base_url, config.client_id.clone())?;
    let session = SearchSession::new(gateway, config.request_timeout());
    let debouncer = QueryDebouncer::new(config.quiet_period());

    Ok(AppState::new(session, debouncer, config.theme()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_zellij(&BTreeMap::new());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.client_id, None);
        assert_eq!(config.quiet_period(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.theme().name, "catppuccin-mocha");
    }

    #[test]
    fn reads_every_key() {
        let config = Config::from_zellij(&raw(&[
            ("api_base_url", "http://localhost:9000"),
            ("client_id", " abc "),
            ("debounce_ms", "100"),
            ("request_timeout_secs", "5"),
            ("theme", "catppuccin-frappe"),
            ("trace_level", "zgallery=debug"),
        ]));

        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.client_id.as_deref(), Some("abc"));
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.theme().name, "catppuccin-frappe");
        assert_eq!(config.trace_level.as_deref(), Some("zgallery=debug"));
    }

    #[test]
    fn blank_and_zero_values_fall_back() {
        let config = Config::from_zellij(&raw(&[
            ("client_id", "   "),
            ("debounce_ms", "0"),
            ("request_timeout_secs", "-3"),
        ]));

        assert_eq!(config.client_id, None);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn unknown_theme_and_missing_file_use_default() {
        let named = Config::from_zellij(&raw(&[("theme", "gruvbox")]));
        assert_eq!(named.theme().name, "catppuccin-mocha");

        let file = Config::from_zellij(&raw(&[
            ("theme", "catppuccin-latte"),
            ("theme_file", "/nonexistent/theme.toml"),
        ]));
        assert_eq!(file.theme().name, "catppuccin-mocha");
    }

    #[test]
    fn initialize_applies_timeouts() {
        let config = Config {
            debounce_ms: 100,
            request_timeout_secs: 3,
            ..Config::default()
        };
        let state = initialize(&config).unwrap();
        assert_eq!(state.debouncer.quiet_period(), Duration::from_millis(100));
        assert_eq!(state.session.request_timeout(), Duration::from_secs(3));
    }
}
