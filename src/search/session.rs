//! Search session state machine.
//!
//! [`SearchSession`] owns the bookkeeping of one search: the committed term,
//! the last accepted page, whether the result set is exhausted, and whether a
//! next-page fetch is in flight. It hands out [`PageFetch`] descriptors for
//! the runtime to send and takes their results back through
//! [`SearchSession::on_response`] or [`SearchSession::expire`].
//!
//! ```text
//! Idle --start_search--> Fetching --ok--> Ready --load_next_page--> FetchingNext
//!                           |                ^                          |
//!                           +--err--> Failed +------ok / err------------+
//! ```

use std::time::{Duration, Instant};

use crate::domain::{NetworkError, ResultItem, SessionSnapshot};
use crate::search::cache::ResultCache;
use crate::search::gateway::RemoteGateway;
use crate::search::orchestrator::{
    FetchKind, FetchOutcome, FetchTicket, PageFetch, PageOrchestrator, RequestId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No committed term.
    Idle,
    /// First page in flight.
    Fetching { request: RequestId },
    /// First page accepted; more pages may be requested.
    Ready,
    /// A next page is in flight.
    FetchingNext { request: RequestId },
    /// First page failed. The term is kept so the search can be retried.
    Failed,
}

/// A displayable row of the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    Data(&'a ResultItem),
    /// Trailing row shown while the next page loads.
    Placeholder,
}

/// How the visible list changed after a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// Contents were replaced or cleared.
    Reset,
    /// `count` rows were added starting at `start`.
    Appended { start: usize, count: usize },
    Unchanged,
}

/// A fetch that finished, successfully or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub ticket: FetchTicket,
    /// True when the fetch no longer belonged to the current search; the
    /// session left its state untouched.
    pub stale: bool,
    pub result: Result<ListChange, NetworkError>,
}

#[derive(Debug)]
pub struct SearchSession {
    orchestrator: PageOrchestrator,
    current_term: String,
    last_page: u32,
    exhausted: bool,
    progress_pending: bool,
    phase: SessionPhase,
    refill_target: u32,
}

impl SearchSession {
    #[must_use]
    pub fn new(gateway: RemoteGateway, request_timeout: Duration) -> Self {
        Self {
            orchestrator: PageOrchestrator::new(gateway, request_timeout),
            current_term: String::new(),
            last_page: 1,
            exhausted: false,
            progress_pending: false,
            phase: SessionPhase::Idle,
            refill_target: 1,
        }
    }

    #[must_use]
    pub fn current_term(&self) -> &str {
        &self.current_term
    }

    #[must_use]
    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True while the trailing placeholder row is shown.
    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.progress_pending
    }

    /// True while the first page of the current term is in flight.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        matches!(self.phase, SessionPhase::Fetching { .. })
    }

    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        self.orchestrator.cache()
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.orchestrator.timeout()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.current_term.clone(), self.last_page)
    }

    /// Starts a new search for `term`, superseding any search in progress.
    ///
    /// The term is lower-cased. Fetches still outstanding for the previous
    /// search complete as stale.
    pub fn start_search(&mut self, term: &str, now: Instant) -> PageFetch {
        let _span = tracing::debug_span!("start_search", term = %term).entered();

        self.current_term = term.to_lowercase();
        self.last_page = 1;
        self.exhausted = false;
        self.progress_pending = false;
        self.refill_target = 1;

        let fetch = self
            .orchestrator
            .begin(&self.current_term, 1, FetchKind::First, now);
        self.phase = SessionPhase::Fetching {
            request: fetch.ticket.id,
        };

        tracing::debug!(request_id = fetch.ticket.id, "search started");
        fetch
    }

    /// Requests the page after the last accepted one.
    ///
    /// Returns `None` without side effects while any fetch is in flight,
    /// once the results are exhausted, or when no first page has been
    /// accepted.
    pub fn load_next_page(&mut self, now: Instant) -> Option<PageFetch> {
        if self.phase != SessionPhase::Ready || self.exhausted {
            tracing::trace!(phase = ?self.phase, exhausted = self.exhausted, "next page not requested");
            return None;
        }

        self.progress_pending = true;
        let page = self.last_page + 1;
        let fetch = self
            .orchestrator
            .begin(&self.current_term, page, FetchKind::Next, now);
        self.phase = SessionPhase::FetchingNext {
            request: fetch.ticket.id,
        };

        tracing::debug!(request_id = fetch.ticket.id, page, "next page requested");
        Some(fetch)
    }

    /// Applies a web response for request `id`.
    ///
    /// Returns `None` for requests that are no longer tracked.
    pub fn on_response(&mut self, id: RequestId, status: u16, body: &[u8]) -> Option<Completion> {
        let (ticket, outcome) = self.orchestrator.resolve(id, status, body)?;
        Some(self.complete(ticket, outcome))
    }

    /// Fails every fetch that has outlived the request timeout.
    pub fn expire(&mut self, now: Instant) -> Vec<Completion> {
        self.orchestrator
            .expire(now)
            .into_iter()
            .map(|(ticket, outcome)| self.complete(ticket, outcome))
            .collect()
    }

    /// Updates session bookkeeping for a finished fetch.
    ///
    /// Only the fetch the current phase is waiting for may change session
    /// state. Errors of stale fetches are still reported so the caller can
    /// decide whether to surface them.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<FetchOutcome, NetworkError>,
    ) -> Completion {
        let awaited = match self.phase {
            SessionPhase::Fetching { request } | SessionPhase::FetchingNext { request } => {
                Some(request)
            }
            _ => None,
        };

        if awaited != Some(ticket.id) {
            tracing::debug!(request_id = ticket.id, term = %ticket.term, "stale completion");
            return Completion {
                ticket,
                stale: true,
                result: outcome.map(|_| ListChange::Unchanged),
            };
        }

        let result = match (ticket.kind, outcome) {
            (FetchKind::First, Ok(outcome)) => {
                self.phase = SessionPhase::Ready;
                tracing::debug!(count = outcome.delta(), "first page accepted");
                Ok(match outcome {
                    FetchOutcome::Discarded => ListChange::Unchanged,
                    _ => ListChange::Reset,
                })
            }
            (FetchKind::First, Err(err)) => {
                self.phase = SessionPhase::Failed;
                tracing::warn!(error = %err, term = %ticket.term, "first page failed");
                Err(err)
            }
            (FetchKind::Next, Ok(outcome)) => {
                self.progress_pending = false;
                self.phase = SessionPhase::Ready;
                match outcome {
                    FetchOutcome::Appended { start, count } if count > 0 => {
                        self.last_page = ticket.page;
                        tracing::debug!(page = ticket.page, count, "next page accepted");
                        Ok(ListChange::Appended { start, count })
                    }
                    FetchOutcome::Appended { .. } => {
                        self.exhausted = true;
                        tracing::debug!(page = ticket.page, "results exhausted");
                        Ok(ListChange::Unchanged)
                    }
                    _ => Ok(ListChange::Unchanged),
                }
            }
            (FetchKind::Next, Err(err)) => {
                self.progress_pending = false;
                self.exhausted = true;
                self.phase = SessionPhase::Ready;
                tracing::warn!(error = %err, page = ticket.page, "next page failed");
                Err(err)
            }
        };

        Completion {
            ticket,
            stale: false,
            result,
        }
    }

    /// Forgets the current search and empties the result list.
    pub fn clear_session(&mut self) {
        tracing::debug!(term = %self.current_term, "session cleared");
        self.current_term.clear();
        self.last_page = 1;
        self.exhausted = false;
        self.progress_pending = false;
        self.refill_target = 1;
        self.phase = SessionPhase::Idle;
        self.orchestrator.clear_data();
    }

    /// Re-runs a persisted search and remembers how deep it had paged.
    ///
    /// Pages after the first are requested one at a time while
    /// [`Self::wants_refill`] holds.
    pub fn restore(&mut self, snapshot: &SessionSnapshot, now: Instant) -> Option<PageFetch> {
        if snapshot.is_empty() {
            return None;
        }

        let fetch = self.start_search(&snapshot.term, now);
        self.refill_target = snapshot.last_page.max(1);
        tracing::debug!(term = %snapshot.term, target = self.refill_target, "restoring search");
        Some(fetch)
    }

    /// True while a restored search has not yet reached its saved depth.
    #[must_use]
    pub fn wants_refill(&self) -> bool {
        self.phase == SessionPhase::Ready && !self.exhausted && self.last_page < self.refill_target
    }

    /// Number of rows to display, including the trailing placeholder.
    #[must_use]
    pub fn visible_row_count(&self) -> usize {
        self.cache().count() + usize::from(self.progress_pending)
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        let count = self.cache().count();
        if index < count {
            self.cache().get(index).map(Row::Data)
        } else if index == count && self.progress_pending {
            Some(Row::Placeholder)
        } else {
            None
        }
    }
}
