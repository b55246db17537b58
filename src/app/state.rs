//! Application state management and view model computation.
//!
//! [`AppState`] is the single owner of everything the plugin knows between
//! events: the search session and its cached pages, the query debouncer, the
//! raw query text, the list selection, the modes and the error notice.
//!
//! # View Model Computation
//!
//! `compute_viewmodel` turns a state snapshot into a renderable
//! [`UIViewModel`]. It windows the result list around the selection, marks
//! the trailing placeholder row, highlights fuzzy matches of the committed
//! term inside titles and picks the empty state message.
//!
//! # Example
//!
//! ```rust
//! use zgallery::app::AppState;
//! use zgallery::search::{QueryDebouncer, RemoteGateway, SearchSession, DEFAULT_REQUEST_TIMEOUT};
//! use zgallery::ui::Theme;
//!
//! let gateway = RemoteGateway::new("https://api.imgur.com", None)?;
//! let session = SearchSession::new(gateway, DEFAULT_REQUEST_TIMEOUT);
//! let state = AppState::new(session, QueryDebouncer::default(), Theme::default());
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert!(viewmodel.empty_state.is_some());
//! # Ok::<(), zgallery::GalleryError>(())
//! ```

use fuzzy_matcher::skim::SkimMatcherV2;

use super::modes::{InputMode, ViewMode};
use crate::domain::ResultItem;
use crate::search::{QueryDebouncer, Row, SearchSession, SessionPhase};
use crate::ui::helpers::{truncate_end, truncate_start};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DetailInfo, DisplayItem, DisplayRow, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo,
    UIViewModel,
};

/// Shortest query that is sent to the gallery.
pub const MIN_QUERY_CHARS: usize = 3;

/// A selection this close to the last loaded row asks for the next page.
pub const NEAR_END_ROWS: usize = 2;

/// Footer notice shown when a fetch for the current query fails.
pub const ERROR_NOTICE: &str = "There was an error. Check your network";

const TITLE_COLUMN_WIDTH: usize = 42;
const KIND_COLUMN_WIDTH: usize = 8;
const SAFETY_MARGIN: usize = 2;

/// Central application state.
///
/// Mutated only by [`crate::app::handle_event`]. Rendering reads it through
/// [`AppState::compute_viewmodel`].
#[derive(Debug)]
pub struct AppState {
    /// The search session, including its result cache.
    pub session: SearchSession,

    /// Collapses keystrokes into committed queries.
    pub debouncer: QueryDebouncer,

    /// Raw contents of the query input, as typed.
    ///
    /// May differ from the session's committed term while the debouncer is
    /// waiting or when the input is shorter than [`MIN_QUERY_CHARS`].
    pub query: String,

    /// Zero-based index of the selected result in the cache.
    ///
    /// Never points at the placeholder row.
    pub selected_index: usize,

    /// Whether keys edit the query or navigate the list.
    pub input_mode: InputMode,

    /// Whether the list or the detail screen is shown.
    pub view_mode: ViewMode,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    /// Error notice shown in the footer until the next search or edit.
    pub notice: Option<String>,
}

impl AppState {
    /// Creates an idle state with the query input focused.
    #[must_use]
    pub fn new(session: SearchSession, debouncer: QueryDebouncer, theme: Theme) -> Self {
        Self {
            session,
            debouncer,
            query: String::new(),
            selected_index: 0,
            input_mode: InputMode::default(),
            view_mode: ViewMode::default(),
            theme,
            notice: None,
        }
    }

    /// Moves the selection one result down, stopping at the last loaded one.
    pub fn move_selection_down(&mut self) {
        let count = self.session.cache().count();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1).min(count - 1);
        tracing::trace!(selected_index = self.selected_index, "selection moved down");
    }

    /// Moves the selection one result up, stopping at the first.
    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
        tracing::trace!(selected_index = self.selected_index, "selection moved up");
    }

    /// Keeps the selection inside the loaded results.
    pub fn clamp_selection(&mut self) {
        let count = self.session.cache().count();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    #[must_use]
    pub fn selected_item(&self) -> Option<&ResultItem> {
        self.session.cache().get(self.selected_index)
    }

    /// True when the selection is within [`NEAR_END_ROWS`] of the last
    /// loaded result.
    #[must_use]
    pub fn is_near_end(&self) -> bool {
        let count = self.session.cache().count();
        count > 0 && self.selected_index + NEAR_END_ROWS + 1 >= count
    }

    /// True when the raw input still reads as `term`.
    #[must_use]
    pub fn query_matches(&self, term: &str) -> bool {
        self.query.to_lowercase() == term
    }

    /// Computes the UI view model from current state and terminal dimensions.
    ///
    /// # Windowing Algorithm
    ///
    /// 1. Calculate available rows after subtracting UI chrome
    /// 2. Center the window around the selected index
    /// 3. Shift the window back near the end so it stays full
    /// 4. Report the selection relative to the window
    ///
    /// The placeholder row counts as a list row, so it scrolls into view
    /// together with the last results.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let header = self.compute_header();
        let footer = self.compute_footer();

        if self.view_mode == ViewMode::Detail {
            if let Some(detail) = self.compute_detail() {
                return UIViewModel {
                    display_items: vec![],
                    selected_index: 0,
                    header,
                    footer,
                    empty_state: None,
                    search_bar: None,
                    detail: Some(detail),
                };
            }
        }

        let total = self.session.visible_row_count();
        if total == 0 {
            return UIViewModel {
                display_items: vec![],
                selected_index: 0,
                header,
                footer,
                empty_state: Some(self.compute_empty_state()),
                search_bar: Some(self.compute_search_bar()),
                detail: None,
            };
        }

        let available_rows = self.calculate_available_rows(rows);

        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(total);

        let actual_count = visible_end - visible_start;
        if actual_count < available_rows && total >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let term = self.session.current_term();
        let matcher = (!term.is_empty()).then(SkimMatcherV2::default);

        let display_items = (visible_start..visible_end)
            .filter_map(|idx| {
                self.session.row(idx).map(|row| match row {
                    Row::Data(item) => {
                        DisplayRow::Item(self.compute_display_item(item, idx, cols, matcher.as_ref()))
                    }
                    Row::Placeholder => DisplayRow::Loading,
                })
            })
            .collect();

        UIViewModel {
            display_items,
            selected_index: self.selected_index.saturating_sub(visible_start),
            header,
            footer,
            empty_state: None,
            search_bar: Some(self.compute_search_bar()),
            detail: None,
        }
    }

    fn compute_display_item(
        &self,
        item: &ResultItem,
        absolute_idx: usize,
        cols: usize,
        matcher: Option<&SkimMatcherV2>,
    ) -> DisplayItem {
        let max_url_width = cols.saturating_sub(TITLE_COLUMN_WIDTH + KIND_COLUMN_WIDTH + SAFETY_MARGIN);

        let title = truncate_end(&item.title, TITLE_COLUMN_WIDTH - SAFETY_MARGIN);
        let thumbnail = truncate_start(&item.thumbnail_url(), max_url_width);
        let highlight_ranges =
            matcher.map_or_else(Vec::new, |m| self.compute_highlight_ranges(&title, m));

        DisplayItem {
            title,
            kind: item.kind_label().to_string(),
            thumbnail,
            is_selected: absolute_idx == self.selected_index,
            highlight_ranges,
        }
    }

    /// Computes character index ranges of the committed term inside `text`.
    ///
    /// Matched character indices from the Skim matcher are coalesced into
    /// `(start, end)` runs with an exclusive end.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, self.session.current_term()) else {
            return vec![];
        };

        let mut ranges = Vec::new();
        let mut run: Option<(usize, usize)> = None;

        for idx in indices {
            run = match run {
                None => Some((idx, idx)),
                Some((start, prev)) if idx == prev + 1 => Some((start, idx)),
                Some((start, prev)) => {
                    ranges.push((start, prev + 1));
                    Some((idx, idx))
                }
            };
        }

        if let Some((start, prev)) = run {
            ranges.push((start, prev + 1));
        }

        ranges
    }

    fn compute_header(&self) -> HeaderInfo {
        let term = self.session.current_term();
        let title = if term.is_empty() {
            " Gallery Search ".to_string()
        } else {
            format!(" Gallery Search: {term} ({}) ", self.session.cache().count())
        };
        HeaderInfo { title }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.view_mode, self.input_mode) {
            (ViewMode::Detail, _) => "ESC: back  j/k: previous/next  q: quit",
            (ViewMode::List, InputMode::Typing) => {
                "ESC/Enter: done  Ctrl+n/p: navigate  Type to search"
            }
            (ViewMode::List, InputMode::Browse) => {
                "j/k or Ctrl+n/p: navigate  Enter: details  /: search  r: retry  q: quit"
            }
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
            notice: self.notice.clone(),
        }
    }

    fn compute_search_bar(&self) -> SearchBarInfo {
        SearchBarInfo {
            query: self.query.clone(),
            is_focused: self.input_mode == InputMode::Typing,
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        let (message, subtitle) = if self.query.chars().count() < MIN_QUERY_CHARS {
            ("Type at least 3 characters", "Press / to edit the query".to_string())
        } else if self.debouncer.has_pending() || self.session.is_searching() {
            ("Searching…", format!("Looking for \"{}\"", self.query))
        } else if self.session.phase() == SessionPhase::Failed {
            ("Search failed", "Press r to retry".to_string())
        } else {
            (
                "No results",
                format!("Nothing matched \"{}\"", self.session.current_term()),
            )
        };

        EmptyState {
            message: message.to_string(),
            subtitle,
        }
    }

    fn compute_detail(&self) -> Option<DetailInfo> {
        let item = self.selected_item()?;
        Some(DetailInfo {
            position: format!(
                "{} of {}",
                self.selected_index + 1,
                self.session.cache().count()
            ),
            title: item.title.clone(),
            kind: item.kind_label().to_string(),
            source_url: item.source_url.clone(),
            thumbnail_url: item.thumbnail_url(),
        })
    }

    /// Rows left for the result list once header, borders, search bar and
    /// footer are drawn.
    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.view_mode {
            ViewMode::Detail => total_rows.saturating_sub(6),
            ViewMode::List => total_rows.saturating_sub(9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{RemoteGateway, DEFAULT_REQUEST_TIMEOUT};
    use std::time::Instant;

    fn state() -> AppState {
        let gateway = RemoteGateway::new("https://api.example.test", None).unwrap();
        AppState::new(
            SearchSession::new(gateway, DEFAULT_REQUEST_TIMEOUT),
            QueryDebouncer::default(),
            Theme::default(),
        )
    }

    fn body(titles: &[&str]) -> Vec<u8> {
        let records: Vec<String> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                format!(
                    r#"{{"title": "{title}", "images": [{{"type": "image/png", "link": "https://i.x.test/p{i}.png"}}]}}"#
                )
            })
            .collect();
        format!(r#"{{"data": [{}]}}"#, records.join(",")).into_bytes()
    }

    fn with_results(term: &str, titles: &[&str]) -> AppState {
        let mut state = state();
        state.query = term.to_string();
        let fetch = state.session.start_search(term, Instant::now());
        state
            .session
            .on_response(fetch.ticket.id, 200, &body(titles))
            .unwrap();
        state
    }

    fn item_titles(vm: &UIViewModel) -> Vec<String> {
        vm.display_items
            .iter()
            .map(|row| match row {
                DisplayRow::Item(item) => item.title.clone(),
                DisplayRow::Loading => "<loading>".to_string(),
            })
            .collect()
    }

    #[test]
    fn short_query_shows_hint() {
        let mut state = state();
        state.query = "ca".to_string();

        let vm = state.compute_viewmodel(24, 80);
        let empty = vm.empty_state.unwrap();
        assert_eq!(empty.message, "Type at least 3 characters");
        assert_eq!(vm.search_bar.unwrap().query, "ca");
    }

    #[test]
    fn pending_query_shows_searching() {
        let mut state = state();
        state.query = "cats".to_string();
        let _ = state.debouncer.push("cats".to_string(), Instant::now());

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.empty_state.unwrap().message, "Searching…");
    }

    #[test]
    fn empty_first_page_shows_no_results() {
        let state = with_results("zzzz", &[]);
        let vm = state.compute_viewmodel(24, 80);
        let empty = vm.empty_state.unwrap();
        assert_eq!(empty.message, "No results");
        assert!(empty.subtitle.contains("zzzz"));
    }

    #[test]
    fn window_follows_selection() {
        let titles: Vec<String> = (0..30).map(|i| format!("cat {i}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let mut state = with_results("cat", &refs);
        state.selected_index = 20;

        let vm = state.compute_viewmodel(19, 80);
        assert_eq!(vm.display_items.len(), 10);
        assert_eq!(item_titles(&vm)[0], "cat 15");
        assert_eq!(vm.selected_index, 5);
    }

    #[test]
    fn window_stays_full_at_the_end() {
        let titles: Vec<String> = (0..30).map(|i| format!("cat {i}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let mut state = with_results("cat", &refs);
        state.selected_index = 29;

        let vm = state.compute_viewmodel(19, 80);
        assert_eq!(vm.display_items.len(), 10);
        assert_eq!(item_titles(&vm)[0], "cat 20");
        assert_eq!(vm.selected_index, 9);
    }

    #[test]
    fn placeholder_row_is_last_while_loading_more() {
        let mut state = with_results("dog", &["dog a", "dog b"]);
        let _ = state.session.load_next_page(Instant::now()).unwrap();

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(item_titles(&vm), vec!["dog a", "dog b", "<loading>"]);
    }

    #[test]
    fn highlights_committed_term_in_titles() {
        let state = with_results("cat", &["my cat"]);
        let vm = state.compute_viewmodel(24, 80);

        let DisplayRow::Item(item) = &vm.display_items[0] else {
            panic!("expected item row");
        };
        assert_eq!(item.highlight_ranges, vec![(3, 6)]);
        assert_eq!(item.kind, "image");
        assert_eq!(item.thumbnail, "https://i.x.test/p0h.png");
    }

    #[test]
    fn long_titles_are_truncated_on_char_boundaries() {
        let title = "é".repeat(60);
        let state = with_results("abc", &[title.as_str()]);
        let vm = state.compute_viewmodel(24, 120);

        let DisplayRow::Item(item) = &vm.display_items[0] else {
            panic!("expected item row");
        };
        assert_eq!(item.title.chars().count(), TITLE_COLUMN_WIDTH - SAFETY_MARGIN);
        assert!(item.title.ends_with("..."));
    }

    #[test]
    fn selection_stops_at_bounds_and_reports_near_end() {
        let mut state = with_results("cat", &["a", "b", "c", "d", "e"]);
        state.move_selection_up();
        assert_eq!(state.selected_index, 0);
        assert!(!state.is_near_end());

        state.move_selection_down();
        state.move_selection_down();
        assert!(state.is_near_end());

        for _ in 0..10 {
            state.move_selection_down();
        }
        assert_eq!(state.selected_index, 4);
    }

    #[test]
    fn detail_view_describes_selected_item() {
        let mut state = with_results("cat", &["first", "second"]);
        state.selected_index = 1;
        state.view_mode = ViewMode::Detail;

        let vm = state.compute_viewmodel(24, 80);
        let detail = vm.detail.unwrap();
        assert_eq!(detail.title, "second");
        assert_eq!(detail.position, "2 of 2");
        assert_eq!(detail.source_url, "https://i.x.test/p1.png");
        assert_eq!(detail.thumbnail_url, "https://i.x.test/p1h.png");
        assert!(vm.search_bar.is_none());
    }

    #[test]
    fn notice_is_carried_to_footer() {
        let mut state = with_results("cat", &["a"]);
        state.notice = Some(ERROR_NOTICE.to_string());
        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.footer.notice.as_deref(), Some(ERROR_NOTICE));
        assert!(!vm.footer.keybindings.is_empty());
    }

    #[test]
    fn query_match_ignores_case() {
        let mut state = state();
        state.query = "Puppy".to_string();
        assert!(state.query_matches("puppy"));
        assert!(!state.query_matches("pupp"));
    }
}
