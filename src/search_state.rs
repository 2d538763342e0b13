//! Client-side search session.
//!
//! Reconciles server pages (250 cards) with client pages (24 cards): a page
//! change either moves the view window over what is already cached or asks
//! for the next server page. The session performs no I/O itself. Transitions
//! hand back a [`FetchRequest`] for the caller to run, and the caller feeds
//! the outcome back through [`SearchSession::complete`] with the ticket it was
//! given. Only the ticket currently in flight is applied, so a late response
//! from a superseded search can never overwrite newer state.

use std::fmt;

use crate::data_models::{CLIENT_PAGE_SIZE, Card, CardPage};
use crate::error::{FetchError, SearchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Error,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Page 1 of a new query. Replaces results.
    Fresh,
    /// Next server page of the current query. Appends to results.
    Continuation,
}

/// Stamp carried by every issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    kind: FetchKind,
    server_page: u32,
}

impl FetchTicket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn server_page(&self) -> u32 {
        self.server_page
    }
}

/// A fetch the caller must perform against the Fetch Gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub query: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageChange {
    /// Served from cache; `client_page` now points at the requested page.
    Moved,
    /// Not cached yet; the next server page must be fetched first.
    Fetch(FetchRequest),
    /// Nothing to show there, or a fetch is already running.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The response belongs to a fetch that is no longer current.
    Stale,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: FetchTicket,
    query: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    query: String,
    server_page: u32,
    client_page: u32,
    status: SearchStatus,
    error: Option<String>,
    has_more_pages: bool,
    results: Vec<Card>,
    generation: u64,
    in_flight: Option<InFlight>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            server_page: 1,
            client_page: 1,
            ..Default::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more_pages(&self) -> bool {
        self.has_more_pages
    }

    pub fn results(&self) -> &[Card] {
        &self.results
    }

    pub fn server_page(&self) -> u32 {
        self.server_page
    }

    pub fn client_page(&self) -> u32 {
        self.client_page
    }

    pub fn total_client_pages(&self) -> u32 {
        self.results.len().div_ceil(CLIENT_PAGE_SIZE) as u32
    }

    /// The query a repeated search would duplicate: a pending fresh search,
    /// or the loaded one while its results are still held. A failed fresh
    /// search leaves no results, so it stays retryable.
    fn active_query(&self) -> Option<&str> {
        match &self.in_flight {
            Some(f) if f.ticket.kind == FetchKind::Fresh => Some(f.query.as_str()),
            _ => match self.status {
                SearchStatus::Success | SearchStatus::Loading => Some(self.query.as_str()),
                SearchStatus::Error if !self.results.is_empty() => Some(self.query.as_str()),
                SearchStatus::Idle | SearchStatus::Error => None,
            },
        }
    }

    fn issue(&mut self, kind: FetchKind, query: String, server_page: u32) -> FetchRequest {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            kind,
            server_page,
        };
        self.in_flight = Some(InFlight {
            ticket,
            query: query.clone(),
        });
        self.status = SearchStatus::Loading;
        self.error = None;
        FetchRequest {
            ticket,
            query,
            page: server_page,
        }
    }

    /// Begin a new search. Returns `Ok(None)` when `query` is the one already
    /// active, so identical searches never fetch twice.
    pub fn start_search(&mut self, query: &str) -> Result<Option<FetchRequest>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if self.active_query() == Some(query) {
            log::debug!("ignoring repeated search for {query:?}");
            return Ok(None);
        }

        self.results.clear();
        self.client_page = 1;
        self.has_more_pages = false;
        Ok(Some(self.issue(FetchKind::Fresh, query.to_string(), 1)))
    }

    /// Navigate to client page `n` (1-based).
    ///
    /// A continuation fetch does not move `client_page` once it lands; the
    /// caller re-requests the page after the new results arrive.
    pub fn request_client_page(&mut self, n: u32) -> Result<PageChange, SearchError> {
        if n == 0 {
            return Err(SearchError::InvalidClientPage(n));
        }

        if n <= self.total_client_pages() {
            self.client_page = n;
            return Ok(PageChange::Moved);
        }

        if self.has_more_pages && !self.is_loading() {
            let next = self.server_page + 1;
            log::debug!("client page {n} not cached, fetching server page {next}");
            let query = self.query.clone();
            return Ok(PageChange::Fetch(self.issue(
                FetchKind::Continuation,
                query,
                next,
            )));
        }

        Ok(PageChange::Ignored)
    }

    /// Apply the outcome of the fetch stamped with `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<CardPage, FetchError>,
    ) -> Completion {
        let in_flight = match self.in_flight.take() {
            Some(f) if f.ticket == ticket => f,
            other => {
                self.in_flight = other;
                log::debug!(
                    "dropping stale response for server page {}",
                    ticket.server_page
                );
                return Completion::Stale;
            }
        };

        match outcome {
            Ok(page) => {
                self.has_more_pages = page.is_full();
                match ticket.kind {
                    FetchKind::Fresh => {
                        self.results = page.data;
                        self.query = in_flight.query;
                    }
                    FetchKind::Continuation => self.results.extend(page.data),
                }
                self.server_page = ticket.server_page;
                self.status = SearchStatus::Success;
                self.error = None;
            }
            Err(e) => {
                log::error!("search for {:?} failed: {e}", in_flight.query);
                if ticket.kind == FetchKind::Fresh {
                    self.results.clear();
                }
                self.status = SearchStatus::Error;
                self.error = Some(e.to_string());
            }
        }
        Completion::Applied
    }

    pub fn current_view(&self) -> View<'_> {
        let len = self.results.len();
        let start = ((self.client_page.max(1) - 1) as usize * CLIENT_PAGE_SIZE).min(len);
        let end = (start + CLIENT_PAGE_SIZE).min(len);
        View {
            cards: &self.results[start..end],
            client_page: self.client_page,
            total_client_pages: self.total_client_pages(),
            count: ResultCount {
                shown: (self.client_page as usize * CLIENT_PAGE_SIZE).min(len),
                total: len,
                has_more: self.has_more_pages,
            },
        }
    }
}

/// The window of cards on the current client page.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub cards: &'a [Card],
    pub client_page: u32,
    pub total_client_pages: u32,
    pub count: ResultCount,
}

/// "Showing X of Y+ cards". The `+` means another server page may exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultCount {
    pub shown: usize,
    pub total: usize,
    pub has_more: bool,
}

impl fmt::Display for ResultCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} of {}{} cards",
            self.shown,
            self.total,
            if self.has_more { "+" } else { "" }
        )
    }
}
