use std::time::Instant;

use crate::protocol::SearchHit;
use crate::state::{ConnectionState, SourceFilter};

/// Read-only snapshot of the engine for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub connection: ConnectionState,
    pub search_active: bool,
    pub term: Option<String>,
    pub started_at: Option<Instant>,
    /// All hits of the current session, arrival order.
    pub results: Vec<SearchHit>,
    /// Hits matching the selected filter, arrival order.
    pub filtered: Vec<SearchHit>,
    /// Distinct sources, first-seen order.
    pub sources: Vec<String>,
    pub selected: SourceFilter,
    pub last_transport_error: Option<String>,
}
