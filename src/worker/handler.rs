//! Persistence worker.
//!
//! Runs on the thread Zellij spawns for `register_worker!`, so snapshot file
//! I/O never blocks rendering. Storage is opened lazily on the first message.

use crate::domain::error::{GalleryError, Result};
use crate::domain::SessionSnapshot;
use crate::infrastructure::paths;
use crate::storage::{JsonStorage, SnapshotRecord, Storage};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

#[derive(Serialize, Deserialize, Default)]
pub struct GalleryWorker {
    #[serde(skip)]
    storage: Option<Box<dyn Storage>>,
}

impl GalleryWorker {
    /// Creates a worker backed by the given storage.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    fn open_default_storage() -> Result<Box<dyn Storage>> {
        Ok(Box::new(JsonStorage::new(paths::snapshot_path())?))
    }

    fn storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        self.storage
            .as_mut()
            .ok_or_else(|| GalleryError::Worker("storage not initialized".to_string()))
    }

    /// Logs a storage result and maps it to a response.
    fn respond<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Re-parents worker spans under the span that sent `message`.
    ///
    /// The returned guard must be held while the message is processed.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }

    /// Processes one request against storage.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = ?message).entered();

        match message {
            WorkerMessage::LoadSnapshot { .. } => Self::respond(
                "load snapshot",
                self.storage().and_then(|storage| storage.load_snapshot()),
                |record| WorkerResponse::SnapshotLoaded {
                    snapshot: record.map(SessionSnapshot::from),
                },
            ),

            WorkerMessage::SaveSnapshot {
                term, last_page, ..
            } => {
                let record = SnapshotRecord::new(term, last_page);
                Self::respond(
                    "save snapshot",
                    self.storage().and_then(|storage| storage.save_snapshot(&record)),
                    |()| WorkerResponse::SnapshotSaved {
                        term: record.term.clone(),
                        last_page: record.last_page,
                    },
                )
            }

            WorkerMessage::ClearSnapshot { .. } => Self::respond(
                "clear snapshot",
                self.storage().and_then(|storage| storage.clear_snapshot()),
                |()| WorkerResponse::SnapshotCleared,
            ),
        }
    }

    /// Parses a JSON request, handles it and serializes the reply.
    ///
    /// Returns `None` if the payload is not a valid request.
    pub fn handle_payload(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = match serde_json::from_str(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                return None;
            }
        };

        let response = self.handle_message(message);
        serde_json::to_string(&response)
            .map_err(|e| tracing::warn!(error = %e, "failed to serialize worker response"))
            .ok()
    }
}

static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for GalleryWorker {
    /// Entry point for messages posted by the plugin. The reply is posted back
    /// under the same message name.
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            crate::observability::init_tracing(&crate::Config::default());
        }

        if self.storage.is_none() {
            match Self::open_default_storage() {
                Ok(storage) => self.storage = Some(storage),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to initialize storage");
                    let response = WorkerResponse::Error {
                        message: format!("failed to initialize storage: {e}"),
                    };
                    if let Ok(payload) = serde_json::to_string(&response) {
                        post_message_to_plugin(PluginMessage {
                            name: message,
                            payload,
                            worker_name: None,
                        });
                    }
                    return;
                }
            }
        }

        if let Some(payload) = self.handle_payload(&payload) {
            post_message_to_plugin(PluginMessage {
                name: message,
                payload,
                worker_name: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn worker(dir: &TempDir) -> GalleryWorker {
        let storage = JsonStorage::new(dir.path().join("session.json")).unwrap();
        GalleryWorker::with_storage(Box::new(storage))
    }

    #[test]
    fn save_then_load_round_trips_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut worker = worker(&dir);

        let saved = worker.handle_message(WorkerMessage::save_snapshot("puppy".to_string(), 4));
        assert_eq!(
            saved,
            WorkerResponse::SnapshotSaved {
                term: "puppy".to_string(),
                last_page: 4
            }
        );

        let loaded = worker.handle_message(WorkerMessage::load_snapshot());
        assert_eq!(
            loaded,
            WorkerResponse::SnapshotLoaded {
                snapshot: Some(SessionSnapshot::new("puppy", 4))
            }
        );
    }

    #[test]
    fn clear_removes_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut worker = worker(&dir);
        worker.handle_message(WorkerMessage::save_snapshot("cat".to_string(), 1));

        assert_eq!(
            worker.handle_message(WorkerMessage::clear_snapshot()),
            WorkerResponse::SnapshotCleared
        );
        assert_eq!(
            worker.handle_message(WorkerMessage::load_snapshot()),
            WorkerResponse::SnapshotLoaded { snapshot: None }
        );
    }

    #[test]
    fn uninitialized_storage_reports_error() {
        let mut worker = GalleryWorker::default();
        assert!(matches!(
            worker.handle_message(WorkerMessage::load_snapshot()),
            WorkerResponse::Error { .. }
        ));
    }

    #[test]
    fn payload_round_trip_through_json() {
        let dir = TempDir::new().unwrap();
        let mut worker = worker(&dir);

        let request = serde_json::to_string(&WorkerMessage::load_snapshot()).unwrap();
        let reply = worker.handle_payload(&request).unwrap();
        let response: WorkerResponse = serde_json::from_str(&reply).unwrap();
        assert_eq!(response, WorkerResponse::SnapshotLoaded { snapshot: None });

        assert!(worker.handle_payload("garbage").is_none());
    }
}
