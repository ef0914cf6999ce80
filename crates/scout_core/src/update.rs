use crate::protocol::{decode_inbound, encode_search, Decoded, SessionId};
use crate::{AppState, ConnectionState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchSubmitted { term, at } => {
            let term = term.trim().to_string();
            // Blank input and concurrent submissions are observable no-ops:
            // at most one session is in flight at a time.
            if term.is_empty() || state.is_search_active() {
                return (state, Vec::new());
            }

            // Aggregation is cleared before the request effect exists, so
            // the result set can only ever hold the new session's stream.
            let session = state.start_session(term.clone(), at);

            let mut effects = Vec::with_capacity(3);
            if state.connection() == ConnectionState::Connected {
                effects.push(Effect::SendSearch {
                    session,
                    frame: encode_search(&term, session),
                });
            } else {
                effects.push(Effect::Connect);
                effects.push(Effect::ScheduleGraceRetry { session });
            }
            // Always armed, whatever the send outcome: the number of
            // expected replies is unknown, so a fixed window is the only
            // bound on the search.
            effects.push(Effect::ScheduleCooldown { session });
            effects
        }
        Msg::GraceElapsed { session } => {
            if state.current_session() != Some(session) || !state.is_search_active() {
                return (state, Vec::new());
            }
            if state.connection() == ConnectionState::Connected {
                let frame = state
                    .session_term()
                    .map(|term| encode_search(term, session));
                match frame {
                    Some(frame) => vec![Effect::SendSearch { session, frame }],
                    None => Vec::new(),
                }
            } else {
                // Single attempt only: the search is abandoned, never
                // retried further.
                state.record_transport_error(
                    "could not establish connection to send search".to_string(),
                );
                state.deactivate_session(session);
                Vec::new()
            }
        }
        Msg::CooldownElapsed { session } => {
            // Unconditional ceiling; stale timers for superseded sessions
            // are ignored via the id check.
            state.deactivate_session(session);
            Vec::new()
        }
        Msg::ChannelState(next) => {
            state.set_connection(next);
            Vec::new()
        }
        Msg::TransportFailed { message } => {
            state.record_transport_error(message);
            Vec::new()
        }
        Msg::FrameReceived(raw) => {
            ingest(&mut state, &raw);
            Vec::new()
        }
        Msg::FilterSelected(filter) => {
            state.set_filter(filter);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Routes one decoded frame into the aggregation. Frames arriving with no
/// active session, or tagged with a superseded session id, are dropped.
fn ingest(state: &mut AppState, raw: &str) {
    if !state.is_search_active() {
        return;
    }
    match decode_inbound(raw) {
        Decoded::Hit { session, hit } => {
            if session_matches(state, session) {
                state.ingest_hit(hit);
            }
        }
        Decoded::Error { session, error } => {
            // Recorded only; one failing source never disturbs the
            // results already gathered from the others.
            if session_matches(state, session) {
                state.ingest_source_error(error);
            }
        }
        Decoded::Unrecognized => {}
    }
}

fn session_matches(state: &AppState, session: Option<SessionId>) -> bool {
    match session {
        // The original wire protocol carries no session id; untagged
        // frames are accepted for whichever session is current.
        None => true,
        Some(id) => state.current_session() == Some(id),
    }
}
