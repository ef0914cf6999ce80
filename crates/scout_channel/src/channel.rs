use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use scout_logging::{client_debug, client_info, client_warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::transport::{Link, Transport};
use crate::types::{ChannelError, ChannelEvent, ChannelSettings, ConnectionState};

enum ChannelCommand {
    Connect,
    Send(String),
    Close,
}

/// Owner of the single duplex channel. Commands go in, events come out;
/// the channel itself lives on a dedicated thread with its own runtime,
/// so callers stay synchronous.
///
/// Dropping the handle tears the channel down: the command sender closes,
/// the worker closes any open link and exits.
pub struct ChannelHandle {
    cmd_tx: UnboundedSender<ChannelCommand>,
    event_rx: mpsc::Receiver<ChannelEvent>,
}

impl ChannelHandle {
    pub fn new(settings: ChannelSettings, transport: Box<dyn Transport>) -> Self {
        let (cmd_tx, cmd_rx) = unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.block_on(run_channel(settings, transport, cmd_rx, event_tx));
        });

        Self { cmd_tx, event_rx }
    }

    /// Requests a connection. Idempotent: a no-op while the channel is
    /// already connecting or connected.
    pub fn connect(&self) {
        let _ = self.cmd_tx.send(ChannelCommand::Connect);
    }

    /// Delivers one frame if connected; otherwise a `NotConnected`
    /// transport error event is pushed. Nothing is queued.
    pub fn send(&self, frame: impl Into<String>) {
        let _ = self.cmd_tx.send(ChannelCommand::Send(frame.into()));
    }

    /// Tears the channel down from any state.
    pub fn close(&self) {
        let _ = self.cmd_tx.send(ChannelCommand::Close);
    }

    pub fn try_recv(&self) -> Option<ChannelEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChannelEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

/// Outcome of one iteration of the channel loop.
enum Step {
    Command(Option<ChannelCommand>),
    Inbound(Result<Option<String>, ChannelError>),
}

async fn run_channel(
    settings: ChannelSettings,
    transport: Box<dyn Transport>,
    mut cmd_rx: UnboundedReceiver<ChannelCommand>,
    event_tx: mpsc::Sender<ChannelEvent>,
) {
    let mut link: Option<Box<dyn Link>> = None;
    let mut state = ConnectionState::Disconnected;

    loop {
        let step = match link.as_mut() {
            Some(active) => {
                tokio::select! {
                    command = cmd_rx.recv() => Step::Command(command),
                    inbound = active.recv() => Step::Inbound(inbound),
                }
            }
            None => Step::Command(cmd_rx.recv().await),
        };

        match step {
            // Command sender dropped: the handle is gone, tear down.
            Step::Command(None) => {
                if let Some(mut active) = link.take() {
                    active.close().await;
                }
                client_debug!("channel worker exiting");
                break;
            }
            Step::Command(Some(command)) => {
                apply_command(
                    command, &settings, &*transport, &mut link, &mut state, &event_tx,
                )
                .await;
            }
            Step::Inbound(Ok(Some(frame))) => {
                client_debug!("frame received ({} bytes)", frame.len());
                let _ = event_tx.send(ChannelEvent::Frame(frame));
            }
            Step::Inbound(Ok(None)) => {
                client_info!("channel closed by peer");
                link = None;
                transition(&mut state, ConnectionState::Disconnected, &event_tx);
            }
            Step::Inbound(Err(err)) => {
                client_warn!("channel read failed: {}", err);
                link = None;
                transition(&mut state, ConnectionState::Errored, &event_tx);
                let _ = event_tx.send(ChannelEvent::TransportError(err));
            }
        }
    }
}

async fn apply_command(
    command: ChannelCommand,
    settings: &ChannelSettings,
    transport: &dyn Transport,
    link: &mut Option<Box<dyn Link>>,
    state: &mut ConnectionState,
    event_tx: &mpsc::Sender<ChannelEvent>,
) {
    match command {
        ChannelCommand::Connect => {
            if matches!(
                state,
                ConnectionState::Connecting | ConnectionState::Connected
            ) {
                return;
            }
            transition(state, ConnectionState::Connecting, event_tx);
            match connect_with_timeout(settings, transport).await {
                Ok(fresh) => {
                    client_info!("channel connected to {}", settings.endpoint);
                    *link = Some(fresh);
                    transition(state, ConnectionState::Connected, event_tx);
                }
                Err(err) => {
                    client_warn!("connect to {} failed: {}", settings.endpoint, err);
                    transition(state, ConnectionState::Errored, event_tx);
                    let _ = event_tx.send(ChannelEvent::TransportError(err));
                }
            }
        }
        ChannelCommand::Send(frame) => {
            let Some(active) = link.as_mut() else {
                let _ = event_tx.send(ChannelEvent::TransportError(ChannelError::NotConnected));
                return;
            };
            if let Err(err) = active.send(frame).await {
                client_warn!("send failed: {}", err);
                *link = None;
                transition(state, ConnectionState::Errored, event_tx);
                let _ = event_tx.send(ChannelEvent::TransportError(err));
            }
        }
        ChannelCommand::Close => {
            if let Some(mut active) = link.take() {
                active.close().await;
            }
            transition(state, ConnectionState::Disconnected, event_tx);
        }
    }
}

async fn connect_with_timeout(
    settings: &ChannelSettings,
    transport: &dyn Transport,
) -> Result<Box<dyn Link>, ChannelError> {
    match tokio::time::timeout(settings.connect_timeout, transport.connect(&settings.endpoint))
        .await
    {
        Ok(outcome) => outcome,
        Err(_elapsed) => Err(ChannelError::ConnectTimeout),
    }
}

fn transition(
    state: &mut ConnectionState,
    next: ConnectionState,
    event_tx: &mpsc::Sender<ChannelEvent>,
) {
    if *state == next {
        return;
    }
    client_debug!("channel state {:?} -> {:?}", state, next);
    *state = next;
    let _ = event_tx.send(ChannelEvent::StateChanged(next));
}
