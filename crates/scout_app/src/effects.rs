use std::sync::mpsc;
use std::time::Duration;

use scout_channel::{ChannelEvent, ChannelHandle};
use scout_core::{Effect, Msg};
use scout_logging::client_info;

use crate::timers::TimerPool;

/// Timing of the session windows driven by the effect runner.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Wait after connect-on-demand before the single send retry.
    pub grace_delay: Duration,
    /// Hard ceiling on the search window.
    pub cooldown: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            grace_delay: Duration::from_secs(1),
            cooldown: Duration::from_secs(10),
        }
    }
}

/// Executes the effects requested by `scout_core::update` and feeds
/// channel events back into the message stream.
pub struct EffectRunner {
    channel: ChannelHandle,
    timers: TimerPool,
    msg_tx: mpsc::Sender<Msg>,
    settings: SearchSettings,
}

impl EffectRunner {
    pub fn new(
        channel: ChannelHandle,
        settings: SearchSettings,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        Self {
            channel,
            timers: TimerPool::new(),
            msg_tx,
            settings,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Connect => self.channel.connect(),
                Effect::SendSearch { session, frame } => {
                    client_info!("sending search request, session={}", session);
                    self.channel.send(frame);
                }
                Effect::ScheduleGraceRetry { session } => self.timers.schedule(
                    self.settings.grace_delay,
                    self.msg_tx.clone(),
                    Msg::GraceElapsed { session },
                ),
                Effect::ScheduleCooldown { session } => self.timers.schedule(
                    self.settings.cooldown,
                    self.msg_tx.clone(),
                    Msg::CooldownElapsed { session },
                ),
            }
        }
    }

    /// Next pending channel event translated into a message, if any.
    pub fn poll_channel(&self) -> Option<Msg> {
        self.channel.try_recv().map(map_event)
    }

    /// Tears down the channel and cancels all pending timers.
    pub fn shutdown(&self) {
        self.timers.cancel_all();
        self.channel.close();
    }
}

fn map_event(event: ChannelEvent) -> Msg {
    match event {
        ChannelEvent::StateChanged(state) => Msg::ChannelState(map_state(state)),
        ChannelEvent::Frame(raw) => Msg::FrameReceived(raw),
        ChannelEvent::TransportError(err) => Msg::TransportFailed {
            message: err.to_string(),
        },
    }
}

fn map_state(state: scout_channel::ConnectionState) -> scout_core::ConnectionState {
    match state {
        scout_channel::ConnectionState::Disconnected => scout_core::ConnectionState::Disconnected,
        scout_channel::ConnectionState::Connecting => scout_core::ConnectionState::Connecting,
        scout_channel::ConnectionState::Connected => scout_core::ConnectionState::Connected,
        scout_channel::ConnectionState::Errored => scout_core::ConnectionState::Errored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_channel::ChannelError;

    #[test]
    fn channel_events_map_onto_core_messages() {
        assert_eq!(
            map_event(ChannelEvent::StateChanged(
                scout_channel::ConnectionState::Connected
            )),
            Msg::ChannelState(scout_core::ConnectionState::Connected)
        );
        assert_eq!(
            map_event(ChannelEvent::Frame("{}".to_string())),
            Msg::FrameReceived("{}".to_string())
        );
        assert_eq!(
            map_event(ChannelEvent::TransportError(ChannelError::NotConnected)),
            Msg::TransportFailed {
                message: "not connected".to_string(),
            }
        );
    }
}
