//! Plugin entry point.
//!
//! Host events become library [`Event`]s, and the [`Action`]s that
//! `handle_event` returns become host calls.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │      Zellij Main Thread      │
//! │  ┌────────────────────────┐  │   web_request ──► gallery API
//! │  │     State (plugin)     │──┼── set_timeout ──► Timer
//! │  └────────────────────────┘  │
//! │             │ IPC            │
//! │             ▼                │
//! │  ┌────────────────────────┐  │
//! │  │ GalleryWorker (worker) │  │  ← snapshot persistence
//! │  └────────────────────────┘  │
//! └──────────────────────────────┘
//! ```
//!
//! # Event Mapping
//!
//! - `Key(Down)`, `Ctrl+n`, mouse scroll down → `Event::KeyDown`
//! - `Key(Up)`, `Ctrl+p`, mouse scroll up → `Event::KeyUp`
//! - `j`/`k` navigate while browsing and are typed while editing
//! - `/` → `Event::SearchMode` while browsing
//! - `r` → `Event::Retry`, `q` → `Event::CloseFocus` while browsing
//! - `Timer` → `Event::Tick`
//! - `WebRequestResult` → `Event::PageResponse`
//! - `CustomMessage` from the worker → `Event::WorkerResponse`

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::time::Instant;

use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use zgallery::search::request_id_from_context;
use zgallery::worker::{GalleryWorker, WorkerMessage, WorkerResponse};
use zgallery::{handle_event, Action, AppState, Config, Event, InputMode};

register_plugin!(State);
register_worker!(GalleryWorker, zgallery_worker, ZGALLERY_WORKER);

struct State {
    app: Option<AppState>,
    worker_name: String,
    startup_error: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: zgallery::initialize(&Config::default()).ok(),
            worker_name: "zgallery".to_string(),
            startup_error: None,
        }
    }
}

impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);

        zgallery::observability::init_tracing(&config);

        let span = tracing::debug_span!("zgallery_load");
        let _guard = span.entered();

        tracing::debug!(
            api_base_url = %config.api_base_url,
            debounce_ms = config.debounce_ms,
            request_timeout_secs = config.request_timeout_secs,
            "parsed configuration"
        );

        match zgallery::initialize(&config) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize, search disabled");
                self.app = None;
                self.startup_error = Some(e.to_string());
            }
        }

        request_permission(&[
            PermissionType::WebAccess,
            PermissionType::ReadApplicationState,
            PermissionType::ChangeApplicationState,
        ]);

        subscribe(&[
            EventType::Key,
            EventType::Mouse,
            EventType::Timer,
            EventType::WebRequestResult,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("loaded, awaiting web and state permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let label = Self::event_label(&event);
        let otel_name = format!("host_event::{label}");
        let span = tracing::debug_span!("host_event", otel.name = %otel_name, host_event = %label);
        let _guard = span.entered();

        let app_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::Mouse(mouse) => match mouse {
                Mouse::ScrollDown(_) => Event::KeyDown,
                Mouse::ScrollUp(_) => Event::KeyUp,
                _ => return false,
            },
            zellij_tile::prelude::Event::Timer(_) => Event::Tick,
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                let Some(request_id) = request_id_from_context(&context) else {
                    tracing::debug!(status, "web response without request id");
                    return false;
                };
                Event::PageResponse {
                    request_id,
                    status,
                    body,
                }
            }
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.worker_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                self.handle_permission_result(permissions);
                return false;
            }
            _ => return false,
        };

        let Some(app) = self.app.as_mut() else {
            return false;
        };

        match handle_event(app, &app_event, Instant::now()) {
            Ok((should_render, actions)) => {
                tracing::debug!(actions = actions.len(), should_render, "host event applied");
                actions.into_iter().for_each(|action| self.execute_action(action));
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "host event failed");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        match (&self.app, &self.startup_error) {
            (Some(app), _) => zgallery::ui::render(app, rows, cols),
            (None, Some(error)) => println!("zgallery could not start: {error}"),
            (None, None) => {}
        }
    }
}

impl State {
    fn event_label(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Mouse(..) => "Mouse".to_string(),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Unhandled".to_string(),
        }
    }

    fn input_mode(&self) -> InputMode {
        self.app.as_ref().map_or(InputMode::Browse, |app| app.input_mode)
    }

    fn key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::trace!(key = ?key.bare_key, "key pressed");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyUp);
        }

        let mode = self.input_mode();
        Some(match key.bare_key {
            BareKey::Down => Event::KeyDown,
            BareKey::Up => Event::KeyUp,
            BareKey::Char('j') if mode == InputMode::Browse => Event::KeyDown,
            BareKey::Char('k') if mode == InputMode::Browse => Event::KeyUp,
            BareKey::Char('/') if mode == InputMode::Browse => Event::SearchMode,
            BareKey::Char('r') if mode == InputMode::Browse => Event::Retry,
            BareKey::Char('q') if mode == InputMode::Browse => Event::CloseFocus,
            BareKey::Esc => Event::Escape,
            BareKey::Enter => Event::Enter,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    fn handle_permission_result(&self, permissions: PermissionStatus) {
        match permissions {
            PermissionStatus::Granted => {
                tracing::debug!("permissions granted - loading saved search");
                self.post_worker_message(&WorkerMessage::load_snapshot());
            }
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - gallery requests will fail");
            }
        }
    }

    fn worker_event(&self, message: &str, payload: &str) -> Option<Event> {
        if message != self.worker_name {
            tracing::debug!(sender = %message, "custom message from another plugin");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => {
                tracing::debug!(?response, "snapshot worker replied");
                Some(Event::WorkerResponse(response))
            }
            Err(e) => {
                tracing::warn!(error = %e, "unreadable worker reply");
                None
            }
        }
    }

    fn post_worker_message(&self, message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::trace!(bytes = payload.len(), "to snapshot worker");
                post_message_to(PluginMessage {
                    worker_name: Some(self.worker_name.clone()),
                    name: self.worker_name.clone(),
                    payload,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "worker message not encodable");
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("hiding gallery pane");
                hide_self();
            }
            Action::PostToWorker(message) => {
                self.post_worker_message(&message);
            }
            Action::SendRequest(request) => {
                tracing::debug!(url = %request.url, "sending page request");
                web_request(
                    &request.url,
                    HttpVerb::Get,
                    request.headers,
                    Vec::new(),
                    request.context,
                );
            }
            Action::ScheduleTimer(delay) => {
                set_timeout(delay.as_secs_f64());
            }
        }
    }
}
