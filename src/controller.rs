use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::data_models::CardPage;
use crate::debounce::Debouncer;
use crate::error::FetchError;
use crate::gateway::CardSource;
use crate::search_state::{FetchRequest, FetchTicket, PageChange, SearchSession};

#[derive(Debug)]
pub enum AppEvent {
    /// Raw input while the user is typing; searched once it settles.
    Typed(String),
    /// Debounced input that has settled.
    Settled(String),
    /// Explicit submit, skips the debounce.
    Submit(String),
    GoToPage(u32),
    NextPage,
    PrevPage,
    Fetched {
        ticket: FetchTicket,
        outcome: Result<CardPage, FetchError>,
    },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Single-threaded event loop around a [`SearchSession`].
///
/// Fetches run on spawned tasks and come back as [`AppEvent::Fetched`], so the
/// session is only ever mutated from here.
pub struct SearchApp<S> {
    session: SearchSession,
    source: Arc<S>,
    debouncer: Debouncer,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl<S: CardSource + 'static> SearchApp<S> {
    pub fn new(source: S, debounce: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session: SearchSession::new(),
            source: Arc::new(source),
            debouncer: Debouncer::new(debounce),
            events_tx,
            events_rx,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.events_tx.clone()
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Process events until `Quit`, calling `on_change` after each one.
    pub async fn run<F>(mut self, mut on_change: F)
    where
        F: FnMut(&SearchSession),
    {
        while let Some(event) = self.events_rx.recv().await {
            if self.handle(event) == Flow::Quit {
                break;
            }
            on_change(&self.session);
        }
        self.debouncer.cancel();
    }

    pub fn handle(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Typed(text) => {
                let text = text.trim();
                if text.is_empty() {
                    self.debouncer.cancel();
                } else {
                    self.debouncer
                        .call(AppEvent::Settled(text.to_string()), self.events_tx.clone());
                }
            }
            AppEvent::Settled(text) => self.search(&text),
            AppEvent::Submit(text) => {
                self.debouncer.cancel();
                self.search(&text);
            }
            AppEvent::GoToPage(n) => self.go_to_page(n),
            AppEvent::NextPage => self.go_to_page(self.session.client_page() + 1),
            AppEvent::PrevPage => {
                if self.session.client_page() > 1 {
                    self.go_to_page(self.session.client_page() - 1);
                }
            }
            AppEvent::Fetched { ticket, outcome } => {
                self.session.complete(ticket, outcome);
            }
            AppEvent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn search(&mut self, query: &str) {
        match self.session.start_search(query) {
            Ok(Some(request)) => self.dispatch(request),
            Ok(None) => {}
            Err(e) => log::warn!("search rejected: {e}"),
        }
    }

    fn go_to_page(&mut self, n: u32) {
        match self.session.request_client_page(n) {
            Ok(PageChange::Fetch(request)) => self.dispatch(request),
            Ok(PageChange::Moved) | Ok(PageChange::Ignored) => {}
            Err(e) => log::warn!("page change rejected: {e}"),
        }
    }

    fn dispatch(&self, request: FetchRequest) {
        let source = self.source.clone();
        let tx = self.events_tx.clone();
        log::info!(
            "fetching server page {} for {:?}",
            request.page,
            request.query
        );
        tokio::spawn(async move {
            let outcome = source.fetch_page(&request.query, request.page).await;
            let _ = tx.send(AppEvent::Fetched {
                ticket: request.ticket,
                outcome,
            });
        });
    }
}
