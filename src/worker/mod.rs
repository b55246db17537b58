//! Background worker that persists the search snapshot.
//!
//! - `messages`: request/response protocol with trace context propagation
//! - `handler`: worker implementation

pub mod handler;
pub mod messages;

pub use handler::GalleryWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
