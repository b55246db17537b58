//! Incremental gallery search core.
//!
//! Text input flows through the [`QueryDebouncer`] into
//! [`SearchSession::start_search`]; scrolling near the end of the list calls
//! [`SearchSession::load_next_page`]. Both hand back a [`PageFetch`] for the
//! runtime to send, and the response is fed back in through
//! [`SearchSession::on_response`]. The [`PageOrchestrator`] guarantees a
//! response for an outdated term never reaches the [`ResultCache`].

pub mod cache;
pub mod debouncer;
pub mod gateway;
pub mod orchestrator;
pub mod session;

pub use cache::ResultCache;
pub use debouncer::{DebounceStep, QueryDebouncer, DEFAULT_QUIET_PERIOD};
pub use gateway::{HttpRequest, RemoteGateway, DEFAULT_API_BASE_URL};
pub use orchestrator::{
    request_id_from_context, FetchKind, FetchOutcome, FetchTicket, PageFetch, PageOrchestrator,
    RequestId, DEFAULT_REQUEST_TIMEOUT, REQUEST_ID_CONTEXT_KEY,
};
pub use session::{Completion, ListChange, Row, SearchSession, SessionPhase};
