//! Message protocol between the plugin and its persistence worker.
//!
//! Messages travel as JSON. Each request carries the caller's trace context
//! so spans recorded in the worker join the plugin-side trace.

use crate::domain::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// Trace and parent span ids of the span that sent a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the ids of the active span, or `None` when there is no valid
    /// OpenTelemetry span (for example when tracing is not initialized).
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_snapshot(LoadSnapshot {}),
    save_snapshot(SaveSnapshot { term: String, last_page: u32 }),
    clear_snapshot(ClearSnapshot {}),
}

/// Requests sent from the plugin to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the persisted search position.
    LoadSnapshot {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist the committed term and last accepted page.
    SaveSnapshot {
        term: String,
        last_page: u32,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Forget the persisted search position.
    ClearSnapshot {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadSnapshot { trace_context }
            | Self::SaveSnapshot { trace_context, .. }
            | Self::ClearSnapshot { trace_context } => trace_context.as_ref(),
        }
    }
}

/// Replies sent from the worker back to the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The stored snapshot, if any.
    SnapshotLoaded { snapshot: Option<SessionSnapshot> },

    SnapshotSaved { term: String, last_page: u32 },

    SnapshotCleared,

    /// A storage operation failed.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_without_active_span_carry_no_context() {
        let message = WorkerMessage::save_snapshot("cat".to_string(), 2);
        assert_eq!(
            message,
            WorkerMessage::SaveSnapshot {
                term: "cat".to_string(),
                last_page: 2,
                trace_context: None,
            }
        );
        assert!(message.trace_context().is_none());
    }

    #[test]
    fn message_json_omits_missing_trace_context() {
        let json = serde_json::to_string(&WorkerMessage::load_snapshot()).unwrap();
        assert_eq!(json, r#"{"LoadSnapshot":{}}"#);

        let parsed: WorkerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, WorkerMessage::LoadSnapshot { trace_context: None });
    }

    #[test]
    fn unit_response_serializes_as_string() {
        let json = serde_json::to_string(&WorkerResponse::SnapshotCleared).unwrap();
        assert_eq!(json, r#""SnapshotCleared""#);
    }
}
