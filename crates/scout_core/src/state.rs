use std::time::Instant;

use crate::protocol::{SearchHit, SessionId, SourceError};
use crate::view_model::AppViewModel;

/// Readiness of the duplex channel as last reported by the connection
/// manager. Transitions only arrive via `Msg::ChannelState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Errored,
}

/// Presentation-side narrowing of the accumulated results.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Source(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchSession {
    pub id: SessionId,
    pub term: String,
    pub active: bool,
    pub started_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    connection: ConnectionState,
    session: Option<SearchSession>,
    results: Vec<SearchHit>,
    sources: Vec<String>,
    selected: SourceFilter,
    source_errors: Vec<SourceError>,
    last_transport_error: Option<String>,
    next_session: SessionId,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            connection: self.connection,
            search_active: self.is_search_active(),
            term: self.session.as_ref().map(|session| session.term.clone()),
            started_at: self.search_started_at(),
            results: self.results.clone(),
            filtered: self.filtered_results(&self.selected),
            sources: self.sources.clone(),
            selected: self.selected.clone(),
            last_transport_error: self.last_transport_error.clone(),
        }
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn is_search_active(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.active)
    }

    /// When the current session was submitted, if one exists.
    pub fn search_started_at(&self) -> Option<Instant> {
        self.session.as_ref().map(|session| session.started_at)
    }

    /// Accumulated hits for the current session, in arrival order.
    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    /// Subsequence of hits matching `filter`, arrival order preserved.
    pub fn filtered_results(&self, filter: &SourceFilter) -> Vec<SearchHit> {
        match filter {
            SourceFilter::All => self.results.clone(),
            SourceFilter::Source(source) => self
                .results
                .iter()
                .filter(|hit| hit.source == *source)
                .cloned()
                .collect(),
        }
    }

    /// Distinct sources seen this session, ordered by first appearance.
    pub fn distinct_sources(&self) -> &[String] {
        &self.sources
    }

    pub fn selected_filter(&self) -> &SourceFilter {
        &self.selected
    }

    pub fn source_errors(&self) -> &[SourceError] {
        &self.source_errors
    }

    pub fn last_transport_error(&self) -> Option<&str> {
        self.last_transport_error.as_deref()
    }

    pub(crate) fn set_connection(&mut self, next: ConnectionState) {
        self.connection = next;
    }

    pub(crate) fn set_filter(&mut self, filter: SourceFilter) {
        self.selected = filter;
    }

    pub(crate) fn current_session(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    pub(crate) fn session_term(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.term.as_str())
    }

    /// Begins a new session, superseding the previous one. Accumulated
    /// hits, sources, per-source errors, and the filter are cleared first.
    pub(crate) fn start_session(&mut self, term: String, at: Instant) -> SessionId {
        self.results.clear();
        self.sources.clear();
        self.source_errors.clear();
        self.selected = SourceFilter::All;
        self.last_transport_error = None;
        self.next_session += 1;
        let id = self.next_session;
        self.session = Some(SearchSession {
            id,
            term,
            active: true,
            started_at: at,
        });
        id
    }

    /// Marks `session` inactive if it is still the current one. Returns
    /// whether the session actually transitioned from active.
    pub(crate) fn deactivate_session(&mut self, session: SessionId) -> bool {
        match self.session.as_mut() {
            Some(current) if current.id == session && current.active => {
                current.active = false;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn record_transport_error(&mut self, message: String) {
        self.last_transport_error = Some(message);
    }

    /// Appends a hit and registers its source (first-seen order).
    pub(crate) fn ingest_hit(&mut self, hit: SearchHit) {
        if !self.sources.contains(&hit.source) {
            self.sources.push(hit.source.clone());
        }
        self.results.push(hit);
    }

    pub(crate) fn ingest_source_error(&mut self, error: SourceError) {
        self.source_errors.push(error);
    }
}
