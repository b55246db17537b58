//! Event handling and state transitions.
//!
//! [`handle_event`] is the only place that mutates [`AppState`]. It maps
//! each [`Event`] onto search session operations and returns the side
//! effects for the runtime as a list of [`Action`]s.
//!
//! # Flow
//!
//! ```text
//! Char/Backspace ──► debouncer.push ──► ScheduleTimer
//! Tick ──► debouncer.poll ──Emit──► session.start_search ──► SendRequest
//!      └─► session.expire ──► timed out fetches fail
//! PageResponse ──► session.on_response ──► refill / notice / SaveSnapshot
//! KeyDown near end ──► session.load_next_page ──► SendRequest
//! ```
//!
//! Every `SendRequest` is followed by a `ScheduleTimer` for the request
//! timeout, so a tick arrives to expire the fetch if the host never answers.

use std::time::{Duration, Instant};

use super::modes::{InputMode, ViewMode};
use super::state::{ERROR_NOTICE, MIN_QUERY_CHARS};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::search::{Completion, DebounceStep, ListChange, PageFetch, RequestId};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Added to the request timeout so the expiry tick lands after the deadline.
const REQUEST_TIMER_SLACK: Duration = Duration::from_millis(50);

/// Events triggered by user input, timers, web responses or the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the selection down; near the end this requests the next page.
    KeyDown,
    /// Moves the selection up.
    KeyUp,
    /// Hides the plugin.
    CloseFocus,
    /// Focuses the query input.
    SearchMode,
    /// Appends a character to the query.
    Char(char),
    /// Removes the last character of the query.
    Backspace,
    /// Leaves the detail view or the query input.
    Escape,
    /// Leaves the query input, or opens the detail view of the selection.
    Enter,
    /// Re-runs the current search from page 1.
    Retry,
    /// A timer armed by [`Action::ScheduleTimer`] fired.
    Tick,
    /// The host answered a web request.
    PageResponse {
        request_id: RequestId,
        status: u16,
        body: Vec<u8>,
    },
    /// Wraps a response from the background worker.
    WorkerResponse(WorkerResponse),
}

impl Event {
    /// Short name used in spans. Response bodies stay out of the trace.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::KeyDown => "KeyDown",
            Self::KeyUp => "KeyUp",
            Self::CloseFocus => "CloseFocus",
            Self::SearchMode => "SearchMode",
            Self::Char(_) => "Char",
            Self::Backspace => "Backspace",
            Self::Escape => "Escape",
            Self::Enter => "Enter",
            Self::Retry => "Retry",
            Self::Tick => "Tick",
            Self::PageResponse { .. } => "PageResponse",
            Self::WorkerResponse(_) => "WorkerResponse",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// `now` is the clock reading for this event. The debouncer and the request
/// timeout compare against it, which keeps the handler deterministic.
///
/// # Returns
///
/// Whether the UI should re-render, and the actions to run in order.
///
/// # Errors
///
/// Reserved for failures of state transitions; the current transitions are
/// infallible.
///
/// # Example
///
/// ```rust
/// use std::time::Instant;
/// use zgallery::app::{handle_event, AppState, Event};
/// use zgallery::search::{QueryDebouncer, RemoteGateway, SearchSession, DEFAULT_REQUEST_TIMEOUT};
/// use zgallery::ui::Theme;
///
/// let gateway = RemoteGateway::new("https://api.imgur.com", None)?;
/// let session = SearchSession::new(gateway, DEFAULT_REQUEST_TIMEOUT);
/// let mut state = AppState::new(session, QueryDebouncer::default(), Theme::default());
///
/// let (render, actions) = handle_event(&mut state, &Event::Char('c'), Instant::now())?;
/// assert!(render);
/// assert!(actions.is_empty());
/// # Ok::<(), zgallery::GalleryError>(())
/// ```
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event, now: Instant) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.kind()).entered();

    match event {
        Event::KeyDown => {
            state.move_selection_down();
            let mut actions = vec![];
            if state.is_near_end() {
                if let Some(fetch) = state.session.load_next_page(now) {
                    tracing::debug!(selected_index = state.selected_index, "scrolled near end");
                    push_fetch(state, fetch, &mut actions);
                }
            }
            Ok((true, actions))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::SearchMode => {
            tracing::debug!("focusing query input");
            state.input_mode = InputMode::Typing;
            state.view_mode = ViewMode::List;
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Typing {
                return Ok((false, vec![]));
            }

            state.query.push(*c);
            tracing::trace!(query = %state.query, char = %c, "query updated");

            Ok((true, query_changed(state, now)))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Typing || state.query.pop().is_none() {
                return Ok((false, vec![]));
            }
            tracing::trace!(query = %state.query, "query shortened");

            Ok((true, query_changed(state, now)))
        }
        Event::Escape => match (state.view_mode, state.input_mode) {
            (ViewMode::Detail, _) => {
                state.view_mode = ViewMode::List;
                Ok((true, vec![]))
            }
            (ViewMode::List, InputMode::Typing) => {
                state.input_mode = InputMode::Browse;
                Ok((true, vec![]))
            }
            (ViewMode::List, InputMode::Browse) => Ok((false, vec![])),
        },
        Event::Enter => {
            if state.input_mode == InputMode::Typing {
                state.input_mode = InputMode::Browse;
                return Ok((true, vec![]));
            }

            if state.view_mode == ViewMode::List && state.selected_item().is_some() {
                tracing::debug!(selected_index = state.selected_index, "opening detail view");
                state.view_mode = ViewMode::Detail;
                return Ok((true, vec![]));
            }

            Ok((false, vec![]))
        }
        Event::Retry => {
            let term = state.session.current_term().to_string();
            if term.is_empty() {
                tracing::debug!("nothing to retry");
                return Ok((false, vec![]));
            }

            tracing::debug!(term = %term, "retrying search");
            let mut actions = vec![];
            commit_search(state, &term, now, &mut actions);
            Ok((true, actions))
        }
        Event::Tick => {
            let mut actions = vec![];
            let mut should_render = false;

            match state.debouncer.poll(now) {
                DebounceStep::Emit(term) => {
                    commit_search(state, &term, now, &mut actions);
                    should_render = true;
                }
                DebounceStep::Rearm(delay) => actions.push(Action::ScheduleTimer(delay)),
                DebounceStep::Idle => {}
            }

            for completion in state.session.expire(now) {
                should_render |= apply_completion(state, &completion, now, &mut actions);
            }

            Ok((should_render, actions))
        }
        Event::PageResponse {
            request_id,
            status,
            body,
        } => {
            let Some(completion) = state.session.on_response(*request_id, *status, body) else {
                tracing::debug!(request_id, "response for untracked request");
                return Ok((false, vec![]));
            };

            let mut actions = vec![];
            let should_render = apply_completion(state, &completion, now, &mut actions);
            Ok((should_render, actions))
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response, now),
    }
}

/// Routes an edited query to the debouncer, or clears the session when the
/// query became too short.
fn query_changed(state: &mut AppState, now: Instant) -> Vec<Action> {
    state.notice = None;

    if state.query.chars().count() >= MIN_QUERY_CHARS {
        return state
            .debouncer
            .push(state.query.clone(), now)
            .map(Action::ScheduleTimer)
            .into_iter()
            .collect();
    }

    state.debouncer.cancel();
    if state.session.current_term().is_empty() && state.session.cache().is_empty() {
        return vec![];
    }

    state.session.clear_session();
    state.selected_index = 0;
    state.view_mode = ViewMode::List;
    vec![Action::PostToWorker(WorkerMessage::clear_snapshot())]
}

fn commit_search(state: &mut AppState, term: &str, now: Instant, actions: &mut Vec<Action>) {
    let fetch = state.session.start_search(term, now);
    state.selected_index = 0;
    state.notice = None;

    push_fetch(state, fetch, actions);
    actions.push(Action::PostToWorker(WorkerMessage::save_snapshot(
        state.session.current_term().to_string(),
        state.session.last_page(),
    )));
}

fn push_fetch(state: &AppState, fetch: PageFetch, actions: &mut Vec<Action>) {
    actions.push(Action::SendRequest(fetch.request));
    actions.push(Action::ScheduleTimer(
        state.session.request_timeout() + REQUEST_TIMER_SLACK,
    ));
}

/// Reacts to a finished fetch. Returns whether the UI changed.
fn apply_completion(
    state: &mut AppState,
    completion: &Completion,
    now: Instant,
    actions: &mut Vec<Action>,
) -> bool {
    let ticket = &completion.ticket;

    if completion.stale {
        if let Err(err) = &completion.result {
            tracing::debug!(term = %ticket.term, error = %err, "error of superseded fetch suppressed");
        }
        return false;
    }

    match &completion.result {
        Ok(ListChange::Reset) => {
            state.clamp_selection();
            refill(state, now, actions);
            true
        }
        Ok(ListChange::Appended { count, .. }) => {
            tracing::debug!(count, last_page = state.session.last_page(), "page appended");
            actions.push(Action::PostToWorker(WorkerMessage::save_snapshot(
                state.session.current_term().to_string(),
                state.session.last_page(),
            )));
            refill(state, now, actions);
            true
        }
        Ok(ListChange::Unchanged) => true,
        Err(err) => {
            if ticket.term == state.session.current_term() && state.query_matches(&ticket.term) {
                tracing::warn!(term = %ticket.term, error = %err, "showing network notice");
                state.notice = Some(ERROR_NOTICE.to_string());
            } else {
                tracing::debug!(term = %ticket.term, error = %err, "error for outdated input not shown");
            }
            true
        }
    }
}

/// Keeps paging a restored search until it reaches its saved depth.
fn refill(state: &mut AppState, now: Instant, actions: &mut Vec<Action>) {
    if !state.session.wants_refill() {
        return;
    }
    if let Some(fetch) = state.session.load_next_page(now) {
        push_fetch(state, fetch, actions);
    }
}

fn handle_worker_response(
    state: &mut AppState,
    response: &WorkerResponse,
    now: Instant,
) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::SnapshotLoaded {
            snapshot: Some(snapshot),
        } => {
            if !state.query.is_empty() || !state.session.current_term().is_empty() {
                tracing::debug!("search already started, saved snapshot ignored");
                return Ok((false, vec![]));
            }

            let Some(fetch) = state.session.restore(snapshot, now) else {
                return Ok((false, vec![]));
            };

            state.query = state.session.current_term().to_string();
            state.input_mode = InputMode::Browse;
            state.selected_index = 0;

            let mut actions = vec![];
            push_fetch(state, fetch, &mut actions);
            Ok((true, actions))
        }
        WorkerResponse::SnapshotLoaded { snapshot: None } => {
            tracing::debug!("no saved snapshot");
            Ok((false, vec![]))
        }
        WorkerResponse::SnapshotSaved { term, last_page } => {
            tracing::trace!(term = %term, last_page, "snapshot saved");
            Ok((false, vec![]))
        }
        WorkerResponse::SnapshotCleared => Ok((false, vec![])),
        WorkerResponse::Error { message } => {
            tracing::error!("Worker error: {}", message);
            Ok((false, vec![]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionSnapshot;
    use crate::search::{
        request_id_from_context, HttpRequest, QueryDebouncer, RemoteGateway, SearchSession,
        DEFAULT_REQUEST_TIMEOUT,
    };
    use crate::ui::Theme;

    fn state() -> AppState {
        let gateway = RemoteGateway::new("https://api.example.test", None).unwrap();
        AppState::new(
            SearchSession::new(gateway, DEFAULT_REQUEST_TIMEOUT),
            QueryDebouncer::default(),
            Theme::default(),
        )
    }

    fn body(prefix: &str, n: usize) -> Vec<u8> {
        let records: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    r#"{{"title": "{prefix} {i}", "images": [{{"type": "image/jpeg", "link": "https://i.x.test/{prefix}{i}.jpg"}}]}}"#
                )
            })
            .collect();
        format!(r#"{{"data": [{}]}}"#, records.join(",")).into_bytes()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn sent(actions: &[Action]) -> Vec<&HttpRequest> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::SendRequest(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn request_id(request: &HttpRequest) -> RequestId {
        request_id_from_context(&request.context).unwrap()
    }

    fn type_text(state: &mut AppState, text: &str, at: Instant) -> Vec<Action> {
        let mut actions = vec![];
        for c in text.chars() {
            let (_, mut more) = handle_event(state, &Event::Char(c), at).unwrap();
            actions.append(&mut more);
        }
        actions
    }

    /// Types `term` and lets the quiet period pass. Returns the request sent.
    fn search(state: &mut AppState, term: &str, at: Instant) -> HttpRequest {
        type_text(state, term, at);
        let (_, actions) = handle_event(state, &Event::Tick, at + ms(250)).unwrap();
        sent(&actions)[0].clone()
    }

    fn respond(state: &mut AppState, request: &HttpRequest, status: u16, body: Vec<u8>) -> (bool, Vec<Action>) {
        let event = Event::PageResponse {
            request_id: request_id(request),
            status,
            body,
        };
        handle_event(state, &event, Instant::now()).unwrap()
    }

    #[test]
    fn short_query_sends_nothing() {
        let mut state = state();
        let actions = type_text(&mut state, "ca", Instant::now());

        assert!(actions.is_empty());
        assert_eq!(state.query, "ca");
        assert!(!state.debouncer.has_pending());
    }

    #[test]
    fn burst_of_keystrokes_sends_one_request_for_last_value() {
        let mut state = state();
        let t0 = Instant::now();

        let (_, first) = handle_event(&mut state, &Event::Char('c'), t0).unwrap();
        assert!(first.is_empty());
        handle_event(&mut state, &Event::Char('a'), t0).unwrap();

        let (_, armed) = handle_event(&mut state, &Event::Char('t'), t0).unwrap();
        assert_eq!(armed, vec![Action::ScheduleTimer(ms(250))]);
        let (_, none) = handle_event(&mut state, &Event::Char('s'), t0 + ms(100)).unwrap();
        assert!(none.is_empty());

        let (_, rearm) = handle_event(&mut state, &Event::Tick, t0 + ms(250)).unwrap();
        assert_eq!(rearm, vec![Action::ScheduleTimer(ms(100))]);

        let (render, actions) = handle_event(&mut state, &Event::Tick, t0 + ms(350)).unwrap();
        assert!(render);
        let requests = sent(&actions);
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/search/time/1?q=cats"));
        assert!(actions.contains(&Action::ScheduleTimer(
            DEFAULT_REQUEST_TIMEOUT + REQUEST_TIMER_SLACK
        )));
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::PostToWorker(WorkerMessage::SaveSnapshot { term, last_page: 1, .. }) if term == "cats"
        )));
    }

    #[test]
    fn response_fills_the_list() {
        let mut state = state();
        let request = search(&mut state, "cat", Instant::now());

        let (render, actions) = respond(&mut state, &request, 200, body("cat", 4));
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(state.session.cache().count(), 4);
        assert_eq!(state.selected_item().unwrap().title, "cat 0");
    }

    #[test]
    fn shortening_query_clears_session_and_snapshot() {
        let mut state = state();
        let request = search(&mut state, "cat", Instant::now());
        respond(&mut state, &request, 200, body("cat", 4));

        let (render, actions) = handle_event(&mut state, &Event::Backspace, Instant::now()).unwrap();
        assert!(render);
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::ClearSnapshot { .. })]
        ));
        assert!(state.session.cache().is_empty());
        assert_eq!(state.session.current_term(), "");
    }

    #[test]
    fn scrolling_near_end_requests_next_page_once() {
        let mut state = state();
        let request = search(&mut state, "cat", Instant::now());
        respond(&mut state, &request, 200, body("cat", 5));
        state.input_mode = InputMode::Browse;

        let (_, first) = handle_event(&mut state, &Event::KeyDown, Instant::now()).unwrap();
        assert!(sent(&first).is_empty());

        let (_, second) = handle_event(&mut state, &Event::KeyDown, Instant::now()).unwrap();
        let requests = sent(&second);
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/search/time/2?q=cat"));
        assert!(state.session.is_loading_more());

        let (_, third) = handle_event(&mut state, &Event::KeyDown, Instant::now()).unwrap();
        assert!(sent(&third).is_empty());

        let next = requests[0].clone();
        let (_, actions) = respond(&mut state, &next, 200, body("more", 3));
        assert_eq!(state.session.cache().count(), 8);
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::PostToWorker(WorkerMessage::SaveSnapshot { last_page: 2, .. })
        )));
    }

    #[test]
    fn failure_for_current_query_shows_notice() {
        let mut state = state();
        let request = search(&mut state, "cat", Instant::now());

        let (render, _) = respond(&mut state, &request, 503, Vec::new());
        assert!(render);
        assert_eq!(state.notice.as_deref(), Some(ERROR_NOTICE));
    }

    #[test]
    fn failure_for_superseded_query_is_silent() {
        let mut state = state();
        let t0 = Instant::now();
        let cat = search(&mut state, "cat", t0);

        for _ in 0..3 {
            handle_event(&mut state, &Event::Backspace, t0).unwrap();
        }
        let dog = search(&mut state, "dog", t0);

        let (render, _) = respond(&mut state, &cat, 500, Vec::new());
        assert!(!render);
        assert_eq!(state.notice, None);

        respond(&mut state, &dog, 200, body("dog", 2));
        assert_eq!(state.session.cache().count(), 2);
    }

    #[test]
    fn failure_is_silent_once_input_moved_on() {
        let mut state = state();
        let t0 = Instant::now();
        let request = search(&mut state, "cat", t0);
        type_text(&mut state, "s", t0);

        respond(&mut state, &request, 500, Vec::new());
        assert_eq!(state.notice, None);
    }

    #[test]
    fn unanswered_request_times_out_on_tick() {
        let mut state = state();
        let t0 = Instant::now();
        search(&mut state, "cat", t0);

        let deadline = t0 + ms(250) + DEFAULT_REQUEST_TIMEOUT + REQUEST_TIMER_SLACK;
        let (render, _) = handle_event(&mut state, &Event::Tick, deadline).unwrap();
        assert!(render);
        assert_eq!(state.notice.as_deref(), Some(ERROR_NOTICE));
    }

    #[test]
    fn retry_reruns_current_search() {
        let mut state = state();
        let request = search(&mut state, "cat", Instant::now());
        respond(&mut state, &request, 500, Vec::new());

        let (_, actions) = handle_event(&mut state, &Event::Retry, Instant::now()).unwrap();
        assert_eq!(sent(&actions).len(), 1);
        assert_eq!(state.notice, None);
        assert!(state.session.is_searching());
    }

    #[test]
    fn saved_snapshot_is_restored_to_its_depth() {
        let mut state = state();
        let snapshot = SessionSnapshot::new("Puppy", 2);
        let event = Event::WorkerResponse(WorkerResponse::SnapshotLoaded {
            snapshot: Some(snapshot),
        });

        let (render, actions) = handle_event(&mut state, &event, Instant::now()).unwrap();
        assert!(render);
        assert_eq!(state.query, "puppy");
        assert_eq!(state.input_mode, InputMode::Browse);
        let first = sent(&actions)[0].clone();

        let (_, actions) = respond(&mut state, &first, 200, body("puppy", 3));
        let second = sent(&actions);
        assert_eq!(second.len(), 1);
        assert!(second[0].url.ends_with("/search/time/2?q=puppy"));

        let second = second[0].clone();
        let (_, actions) = respond(&mut state, &second, 200, body("more", 3));
        assert!(sent(&actions).is_empty());
        assert_eq!(state.session.last_page(), 2);
    }

    #[test]
    fn snapshot_ignored_once_user_typed() {
        let mut state = state();
        type_text(&mut state, "do", Instant::now());

        let event = Event::WorkerResponse(WorkerResponse::SnapshotLoaded {
            snapshot: Some(SessionSnapshot::new("cats", 1)),
        });
        let (render, actions) = handle_event(&mut state, &event, Instant::now()).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn enter_and_escape_walk_through_modes() {
        let mut state = state();
        let request = search(&mut state, "cat", Instant::now());
        respond(&mut state, &request, 200, body("cat", 2));

        handle_event(&mut state, &Event::Enter, Instant::now()).unwrap();
        assert_eq!(state.input_mode, InputMode::Browse);

        handle_event(&mut state, &Event::Enter, Instant::now()).unwrap();
        assert_eq!(state.view_mode, ViewMode::Detail);

        handle_event(&mut state, &Event::Escape, Instant::now()).unwrap();
        assert_eq!(state.view_mode, ViewMode::List);

        let (render, _) = handle_event(&mut state, &Event::Escape, Instant::now()).unwrap();
        assert!(!render);

        handle_event(&mut state, &Event::SearchMode, Instant::now()).unwrap();
        assert_eq!(state.input_mode, InputMode::Typing);
    }

    #[test]
    fn chars_are_ignored_while_browsing() {
        let mut state = state();
        state.input_mode = InputMode::Browse;

        let (render, actions) = handle_event(&mut state, &Event::Char('x'), Instant::now()).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.query.is_empty());
    }

    #[test]
    fn close_focus_hides_plugin() {
        let mut state = state();
        let (render, actions) = handle_event(&mut state, &Event::CloseFocus, Instant::now()).unwrap();
        assert!(!render);
        assert_eq!(actions, vec![Action::CloseFocus]);
    }
}
