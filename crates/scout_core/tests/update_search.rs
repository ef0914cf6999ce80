use std::sync::Once;
use std::time::Instant;

use scout_core::{encode_search, update, AppState, ConnectionState, Effect, Msg};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scout_logging::initialize_for_tests);
}

fn submit(state: AppState, term: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::SearchSubmitted {
            term: term.to_string(),
            at: Instant::now(),
        },
    )
}

fn connected(state: AppState) -> AppState {
    update(state, Msg::ChannelState(ConnectionState::Connected)).0
}

#[test]
fn blank_terms_are_rejected_without_effects() {
    init_logging();
    let state = connected(AppState::new());

    let (next, effects) = submit(state.clone(), "");
    assert_eq!(next, state);
    assert!(effects.is_empty());

    let (next, effects) = submit(state.clone(), "   \t ");
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn submit_while_connected_sends_immediately_and_arms_cooldown() {
    init_logging();
    let state = connected(AppState::new());

    let (next, effects) = submit(state, "Dune");

    assert!(next.is_search_active());
    assert_eq!(
        effects,
        vec![
            Effect::SendSearch {
                session: 1,
                frame: encode_search("Dune", 1),
            },
            Effect::ScheduleCooldown { session: 1 },
        ]
    );
}

#[test]
fn submitted_terms_are_trimmed_before_encoding() {
    init_logging();
    let state = connected(AppState::new());

    let (_next, effects) = submit(state, "  Dune  ");

    assert_eq!(
        effects[0],
        Effect::SendSearch {
            session: 1,
            frame: encode_search("Dune", 1),
        }
    );
}

#[test]
fn second_submit_while_active_is_a_noop() {
    init_logging();
    let state = connected(AppState::new());
    let (state, _effects) = submit(state, "X");

    let (next, effects) = submit(state.clone(), "Y");

    assert_eq!(next, state);
    assert!(effects.is_empty());
    assert_eq!(next.view().term.as_deref(), Some("X"));
}

#[test]
fn resubmit_is_allowed_once_the_cooldown_fires() {
    init_logging();
    let state = connected(AppState::new());
    let (state, _effects) = submit(state, "X");
    let (state, _effects) = update(state, Msg::CooldownElapsed { session: 1 });
    assert!(!state.is_search_active());

    let (next, effects) = submit(state, "Y");

    assert!(next.is_search_active());
    assert_eq!(
        effects,
        vec![
            Effect::SendSearch {
                session: 2,
                frame: encode_search("Y", 2),
            },
            Effect::ScheduleCooldown { session: 2 },
        ]
    );
}

#[test]
fn aggregation_is_empty_at_the_instant_the_request_is_emitted() {
    init_logging();
    let state = connected(AppState::new());
    let (state, _effects) = submit(state, "X");
    let (state, _effects) = update(
        state,
        Msg::FrameReceived(r#"{"source":"site1","title":"X"}"#.to_string()),
    );
    assert_eq!(state.results().len(), 1);
    let (state, _effects) = update(state, Msg::CooldownElapsed { session: 1 });

    let (next, effects) = submit(state, "Y");

    assert!(matches!(effects[0], Effect::SendSearch { .. }));
    assert!(next.results().is_empty());
    assert!(next.distinct_sources().is_empty());
}

#[test]
fn submit_while_disconnected_connects_and_defers_the_send() {
    init_logging();
    let state = AppState::new();

    let (next, effects) = submit(state, "Dune");

    assert!(next.is_search_active());
    assert_eq!(
        effects,
        vec![
            Effect::Connect,
            Effect::ScheduleGraceRetry { session: 1 },
            Effect::ScheduleCooldown { session: 1 },
        ]
    );
}

#[test]
fn grace_retry_sends_once_the_channel_came_up() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit(state, "Dune");
    let state = connected(state);

    let (next, effects) = update(state, Msg::GraceElapsed { session: 1 });

    assert!(next.is_search_active());
    assert_eq!(
        effects,
        vec![Effect::SendSearch {
            session: 1,
            frame: encode_search("Dune", 1),
        }]
    );
}

#[test]
fn grace_retry_without_connection_abandons_the_search() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = submit(state, "Dune");

    let (next, effects) = update(state, Msg::GraceElapsed { session: 1 });

    assert!(effects.is_empty());
    assert!(!next.is_search_active());
    assert!(next.last_transport_error().is_some());
}

#[test]
fn cooldown_deactivates_the_session_exactly_once() {
    init_logging();
    let state = connected(AppState::new());
    let (state, _effects) = submit(state, "X");

    let (state, effects) = update(state, Msg::CooldownElapsed { session: 1 });
    assert!(effects.is_empty());
    assert!(!state.is_search_active());

    // A second firing finds nothing left to transition.
    let (next, effects) = update(state.clone(), Msg::CooldownElapsed { session: 1 });
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn stale_timers_from_a_superseded_session_are_ignored() {
    init_logging();
    let state = connected(AppState::new());
    let (state, _effects) = submit(state, "X");
    let (state, _effects) = update(state, Msg::CooldownElapsed { session: 1 });
    let (state, _effects) = submit(state, "Y");
    assert!(state.is_search_active());

    let (state, effects) = update(state, Msg::GraceElapsed { session: 1 });
    assert!(effects.is_empty());
    assert!(state.is_search_active());

    let (state, effects) = update(state, Msg::CooldownElapsed { session: 1 });
    assert!(effects.is_empty());
    assert!(state.is_search_active());
}

#[test]
fn transport_failures_are_surfaced_as_state_not_panics() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(
        state,
        Msg::TransportFailed {
            message: "connection refused".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.last_transport_error(), Some("connection refused"));
}

#[test]
fn channel_transitions_are_recorded() {
    init_logging();
    let state = AppState::new();
    assert_eq!(state.connection(), ConnectionState::Disconnected);

    let (state, _effects) = update(state, Msg::ChannelState(ConnectionState::Connecting));
    assert_eq!(state.connection(), ConnectionState::Connecting);

    let (state, _effects) = update(state, Msg::ChannelState(ConnectionState::Errored));
    assert_eq!(state.connection(), ConnectionState::Errored);
}
