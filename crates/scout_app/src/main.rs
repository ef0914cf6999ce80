//! Terminal front end for the scout search engine: submits one search,
//! streams hits to stdout as sources report in, and prints a per-source
//! summary once the search window closes.
mod effects;
mod timers;

use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use scout_channel::{ChannelHandle, ChannelSettings, WsTransport};
use scout_core::{update, AppState, AppViewModel, Msg};
use scout_logging::{client_info, LogDestination};

use crate::effects::{EffectRunner, SearchSettings};

fn main() -> ExitCode {
    scout_logging::initialize(LogDestination::Both(Path::new("./scout.log")));

    let mut args = std::env::args().skip(1);
    let Some(term) = args.next() else {
        eprintln!("usage: scout_app <term> [endpoint]");
        return ExitCode::FAILURE;
    };
    if term.trim().is_empty() {
        eprintln!("usage: scout_app <term> [endpoint]");
        return ExitCode::FAILURE;
    }
    let endpoint = args
        .next()
        .unwrap_or_else(|| ChannelSettings::default().endpoint);

    run(term, endpoint)
}

fn run(term: String, endpoint: String) -> ExitCode {
    let channel = ChannelHandle::new(
        ChannelSettings {
            endpoint: endpoint.clone(),
            ..ChannelSettings::default()
        },
        Box::new(WsTransport),
    );
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(channel, SearchSettings::default(), msg_tx.clone());

    client_info!("searching {:?} via {}", term, endpoint);
    println!("Searching for {term:?} ...");

    // Submitting while disconnected makes the engine connect on demand
    // and defer the send behind the grace retry.
    let (mut state, effects) = update(
        AppState::new(),
        Msg::SearchSubmitted {
            term,
            at: Instant::now(),
        },
    );
    runner.run(effects);

    let mut printed = 0;
    loop {
        let mut inbox = Vec::new();
        while let Some(msg) = runner.poll_channel() {
            inbox.push(msg);
        }
        while let Ok(msg) = msg_rx.try_recv() {
            inbox.push(msg);
        }
        for msg in inbox {
            let (next, effects) = update(state, msg);
            state = next;
            runner.run(effects);
        }

        let view = state.view();
        for hit in &view.results[printed..] {
            println!("  [{}] {} -> {}", hit.source, hit.title, hit.link);
        }
        printed = view.results.len();

        // The window closed: cooldown elapsed or the search was abandoned.
        if !view.search_active {
            print_summary(&view);
            runner.shutdown();
            let failed = view.results.is_empty() && view.last_transport_error.is_some();
            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
        thread::sleep(Duration::from_millis(20));
    }
}

fn print_summary(view: &AppViewModel) {
    println!();
    println!("{} result(s) from {} source(s)", view.results.len(), view.sources.len());
    for source in &view.sources {
        let count = view
            .results
            .iter()
            .filter(|hit| hit.source == *source)
            .count();
        println!("  {source}: {count}");
    }
    if let Some(error) = &view.last_transport_error {
        eprintln!("transport error: {error}");
    }
}
