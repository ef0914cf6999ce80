use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scout_core::Msg;

/// Cancelable one-shot timers for the grace and cooldown windows.
///
/// Each timer remembers the pool generation it was armed under; bumping
/// the generation orphans every pending timer, so nothing fires into the
/// state machine after teardown. Stale firings for superseded sessions
/// are additionally ignored by `update` via the session id.
pub struct TimerPool {
    generation: Arc<AtomicU64>,
}

impl TimerPool {
    pub fn new() -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Delivers `msg` after `delay` unless the pool is cancelled first.
    pub fn schedule(&self, delay: Duration, msg_tx: mpsc::Sender<Msg>, msg: Msg) {
        let generation = self.generation.clone();
        let armed_under = generation.load(Ordering::SeqCst);
        thread::spawn(move || {
            thread::sleep(delay);
            if generation.load(Ordering::SeqCst) == armed_under {
                let _ = msg_tx.send(msg);
            }
        });
    }

    /// Cancels every timer currently pending.
    pub fn cancel_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for TimerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerPool {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
