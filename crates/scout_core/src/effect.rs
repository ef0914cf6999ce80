use crate::protocol::SessionId;

/// Side effects requested by `update`; executed by the platform runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the duplex channel. Idempotent at the channel layer.
    Connect,
    /// Deliver the encoded search request over the channel.
    SendSearch { session: SessionId, frame: String },
    /// Arm the single deferred send retry after connect-on-demand.
    ScheduleGraceRetry { session: SessionId },
    /// Arm the hard ceiling that ends the search window.
    ScheduleCooldown { session: SessionId },
}
