use std::time::Instant;

use crate::protocol::SessionId;
use crate::state::{ConnectionState, SourceFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a search term.
    SearchSubmitted { term: String, at: Instant },
    /// User narrowed the result view to one source (or back to all).
    FilterSelected(SourceFilter),
    /// Readiness transition pushed by the connection manager.
    ChannelState(ConnectionState),
    /// A raw frame arrived on the channel.
    FrameReceived(String),
    /// The channel reported a failure (connect, send, or unexpected close).
    TransportFailed { message: String },
    /// One-shot connect grace delay elapsed for the tagged session.
    GraceElapsed { session: SessionId },
    /// Cooldown ceiling elapsed for the tagged session.
    CooldownElapsed { session: SessionId },
    /// Fallback for placeholder wiring.
    NoOp,
}
