//! Tracing with file-based OpenTelemetry export.
//!
//! ```text
//! tracing macros -> tracing-opentelemetry -> SDK tracer -> FileSpanExporter -> rotating OTLP JSON file
//! ```
//!
//! Spans land in `~/.local/share/zellij/zgallery/zgallery-otlp.json` (seen as
//! `/host/.local/share/zellij/zgallery/` from inside the sandbox), one OTLP
//! document per line. The file rotates at 10 MB and keeps three backups.
//! The level comes from the `trace_level` plugin option.

mod exporter;
mod init;
mod otlp;
mod rotating;

pub use init::{init_tracing, TRACE_FILE_NAME};
