//! Fetch coordination between the gateway and the result cache.
//!
//! Every fetch is tagged with the search term and search generation that
//! issued it. A completed fetch may only mutate the cache when both still
//! match; anything else is discarded with a zero delta.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::domain::{NetworkError, ResultItem};
use crate::search::cache::ResultCache;
use crate::search::gateway::{HttpRequest, RemoteGateway};

/// Identifier carried through the runtime's web request context.
pub type RequestId = u64;

/// Context key under which the request id travels with a web request.
pub const REQUEST_ID_CONTEXT_KEY: &str = "zgallery_request_id";

/// Default time after which an unanswered fetch is failed.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Extracts the request id from a web response context.
#[must_use]
pub fn request_id_from_context(context: &BTreeMap<String, String>) -> Option<RequestId> {
    context.get(REQUEST_ID_CONTEXT_KEY)?.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Page 1 of a new search; replaces the cache.
    First,
    /// A subsequent page; appends to the cache.
    Next,
}

/// Identity of one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: RequestId,
    pub term: String,
    pub page: u32,
    pub kind: FetchKind,
    generation: u64,
}

/// A fetch that has been registered and must now be sent by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetch {
    pub ticket: FetchTicket,
    pub request: HttpRequest,
}

/// What applying a completed fetch did to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// First page stored; holds the new item count.
    Replaced(usize),
    /// Next page stored at `start`; `count` may be zero.
    Appended { start: usize, count: usize },
    /// The fetch was stale and left the cache untouched.
    Discarded,
}

impl FetchOutcome {
    /// Number of items the fetch contributed.
    #[must_use]
    pub fn delta(self) -> usize {
        match self {
            Self::Replaced(n) => n,
            Self::Appended { count, .. } => count,
            Self::Discarded => 0,
        }
    }
}

#[derive(Debug)]
struct InFlight {
    ticket: FetchTicket,
    issued_at: Instant,
}

/// Owns the result cache and decides which completed fetches may touch it.
#[derive(Debug)]
pub struct PageOrchestrator {
    gateway: RemoteGateway,
    cache: ResultCache,
    last_requested_term: String,
    generation: u64,
    next_id: RequestId,
    in_flight: BTreeMap<RequestId, InFlight>,
    timeout: Duration,
}

impl PageOrchestrator {
    #[must_use]
    pub fn new(gateway: RemoteGateway, timeout: Duration) -> Self {
        Self {
            gateway,
            cache: ResultCache::new(),
            last_requested_term: String::new(),
            generation: 0,
            next_id: 1,
            in_flight: BTreeMap::new(),
            timeout,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    #[must_use]
    pub fn last_requested_term(&self) -> &str {
        &self.last_requested_term
    }

    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Registers a fetch and returns the request to send.
    ///
    /// The term becomes the last requested term before anything is
    /// dispatched, so a completion from any earlier term is already stale by
    /// the time it can arrive. A first-page fetch also starts a new search
    /// generation, which makes outstanding fetches for a repeated term stale.
    pub fn begin(&mut self, term: &str, page: u32, kind: FetchKind, now: Instant) -> PageFetch {
        if kind == FetchKind::First {
            self.generation += 1;
        }
        self.last_requested_term = term.to_string();

        let id = self.next_id;
        self.next_id += 1;

        let ticket = FetchTicket {
            id,
            term: term.to_string(),
            page,
            kind,
            generation: self.generation,
        };

        let mut request = self.gateway.page_request(term, page);
        request
            .context
            .insert(REQUEST_ID_CONTEXT_KEY.to_string(), id.to_string());

        tracing::debug!(request_id = id, term = %term, page, ?kind, "fetch issued");

        self.in_flight.insert(
            id,
            InFlight {
                ticket: ticket.clone(),
                issued_at: now,
            },
        );

        PageFetch { ticket, request }
    }

    /// True when `ticket` no longer belongs to the current search.
    #[must_use]
    pub fn is_stale(&self, ticket: &FetchTicket) -> bool {
        ticket.term != self.last_requested_term || ticket.generation != self.generation
    }

    /// Applies a completed fetch to the cache.
    ///
    /// # Errors
    ///
    /// A failed fetch is passed through unchanged and never touches the cache.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<ResultItem>, NetworkError>,
    ) -> Result<FetchOutcome, NetworkError> {
        let items = result?;

        if self.is_stale(ticket) {
            tracing::debug!(
                request_id = ticket.id,
                term = %ticket.term,
                current = %self.last_requested_term,
                "discarding stale page"
            );
            return Ok(FetchOutcome::Discarded);
        }

        let outcome = match ticket.kind {
            FetchKind::First => FetchOutcome::Replaced(self.cache.replace(items)),
            FetchKind::Next => {
                let start = self.cache.count();
                let count = self.cache.append(items);
                FetchOutcome::Appended { start, count }
            }
        };

        tracing::debug!(request_id = ticket.id, page = ticket.page, ?outcome, "page applied");
        Ok(outcome)
    }

    /// Completes the in-flight fetch `id` with a raw web response.
    ///
    /// Returns `None` for ids that are not in flight, such as fetches that
    /// already timed out.
    pub fn resolve(
        &mut self,
        id: RequestId,
        status: u16,
        body: &[u8],
    ) -> Option<(FetchTicket, Result<FetchOutcome, NetworkError>)> {
        let Some(entry) = self.in_flight.remove(&id) else {
            tracing::debug!(request_id = id, "response for unknown request ignored");
            return None;
        };

        let parsed = self.gateway.parse_page(status, body);
        let outcome = self.apply(&entry.ticket, parsed);
        Some((entry.ticket, outcome))
    }

    /// Removes every fetch in flight for at least the request timeout and
    /// fails it with [`NetworkError::Timeout`].
    pub fn expire(&mut self, now: Instant) -> Vec<(FetchTicket, Result<FetchOutcome, NetworkError>)> {
        let overdue: Vec<RequestId> = self
            .in_flight
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.issued_at) >= self.timeout)
            .map(|(id, _)| *id)
            .collect();

        let mut expired = Vec::with_capacity(overdue.len());
        for id in overdue {
            let Some(entry) = self.in_flight.remove(&id) else {
                continue;
            };
            tracing::warn!(request_id = id, term = %entry.ticket.term, "fetch timed out");
            let outcome = self.apply(&entry.ticket, Err(NetworkError::Timeout));
            expired.push((entry.ticket, outcome));
        }
        expired
    }

    /// Forgets the current term and empties the cache.
    ///
    /// Fetches still in flight stay registered and complete as stale.
    pub fn clear_data(&mut self) {
        self.last_requested_term.clear();
        self.generation += 1;
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &[u8] = br#"{"data": [
        {"title": "a", "images": [{"type": "image/png", "link": "https://i.x.test/a.png"}]},
        {"title": "b", "images": [{"type": "image/png", "link": "https://i.x.test/b.png"}]}
    ]}"#;

    fn orchestrator() -> PageOrchestrator {
        let gateway = RemoteGateway::new("https://api.example.test", None).unwrap();
        PageOrchestrator::new(gateway, DEFAULT_REQUEST_TIMEOUT)
    }

    #[test]
    fn begin_tags_request_context_with_id() {
        let mut orch = orchestrator();
        let fetch = orch.begin("cat", 1, FetchKind::First, Instant::now());

        assert_eq!(request_id_from_context(&fetch.request.context), Some(fetch.ticket.id));
        assert_eq!(orch.last_requested_term(), "cat");
        assert_eq!(orch.in_flight_count(), 1);
    }

    #[test]
    fn stale_term_completion_is_discarded() {
        let mut orch = orchestrator();
        let now = Instant::now();
        let cat = orch.begin("cat", 1, FetchKind::First, now);
        let dog = orch.begin("dog", 1, FetchKind::First, now);

        let (_, dog_outcome) = orch.resolve(dog.ticket.id, 200, PAGE).unwrap();
        assert_eq!(dog_outcome, Ok(FetchOutcome::Replaced(2)));

        let (_, cat_outcome) = orch.resolve(cat.ticket.id, 200, br#"{"data": []}"#).unwrap();
        assert_eq!(cat_outcome, Ok(FetchOutcome::Discarded));
        assert_eq!(cat_outcome.unwrap().delta(), 0);
        assert_eq!(orch.cache().count(), 2);
        assert_eq!(orch.cache().get(0).map(|i| i.title.as_str()), Some("a"));
    }

    #[test]
    fn repeated_term_discards_older_generation() {
        let mut orch = orchestrator();
        let now = Instant::now();
        let old = orch.begin("cat", 1, FetchKind::First, now);
        let _new = orch.begin("cat", 1, FetchKind::First, now);

        let (_, outcome) = orch.resolve(old.ticket.id, 200, PAGE).unwrap();
        assert_eq!(outcome, Ok(FetchOutcome::Discarded));
        assert!(orch.cache().is_empty());
    }

    #[test]
    fn next_page_appends_after_first() {
        let mut orch = orchestrator();
        let now = Instant::now();
        let first = orch.begin("cat", 1, FetchKind::First, now);
        orch.resolve(first.ticket.id, 200, PAGE).unwrap();

        let next = orch.begin("cat", 2, FetchKind::Next, now);
        let (ticket, outcome) = orch.resolve(next.ticket.id, 200, PAGE).unwrap();
        assert_eq!(ticket.page, 2);
        assert_eq!(outcome, Ok(FetchOutcome::Appended { start: 2, count: 2 }));
        assert_eq!(orch.cache().count(), 4);
    }

    #[test]
    fn failure_passes_through_without_mutation() {
        let mut orch = orchestrator();
        let now = Instant::now();
        let first = orch.begin("cat", 1, FetchKind::First, now);
        orch.resolve(first.ticket.id, 200, PAGE).unwrap();

        let next = orch.begin("cat", 2, FetchKind::Next, now);
        let (_, outcome) = orch.resolve(next.ticket.id, 503, b"").unwrap();
        assert_eq!(outcome, Err(NetworkError::Status(503)));
        assert_eq!(orch.cache().count(), 2);
    }

    #[test]
    fn unknown_request_id_is_ignored() {
        let mut orch = orchestrator();
        assert!(orch.resolve(42, 200, PAGE).is_none());
    }

    #[test]
    fn expire_fails_overdue_fetches_once() {
        let mut orch = orchestrator();
        let start = Instant::now();
        let fetch = orch.begin("cat", 1, FetchKind::First, start);

        assert!(orch.expire(start + Duration::from_secs(5)).is_empty());

        let expired = orch.expire(start + DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].0.id, fetch.ticket.id);
        assert_eq!(expired[0].1, Err(NetworkError::Timeout));

        assert_eq!(orch.in_flight_count(), 0);
        assert!(orch.resolve(fetch.ticket.id, 200, PAGE).is_none());
    }

    #[test]
    fn clear_data_makes_in_flight_fetches_stale() {
        let mut orch = orchestrator();
        let fetch = orch.begin("cat", 1, FetchKind::First, Instant::now());
        orch.clear_data();

        assert_eq!(orch.last_requested_term(), "");
        let (_, outcome) = orch.resolve(fetch.ticket.id, 200, PAGE).unwrap();
        assert_eq!(outcome, Ok(FetchOutcome::Discarded));
        assert!(orch.cache().is_empty());
    }
}
