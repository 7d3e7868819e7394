//! Cancellable repeating task driving the periodic reposition cycle.
//!
//! Runs a closure after an initial delay and then on each interval
//! tick. The closure signals whether to keep running, so a failed
//! reposition ends the cycle instead of re-arming it.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// A running tick task.
struct TickerEntry {
    /// Cancels the task on stop or replacement.
    token: CancellationToken,
    /// Handle of the spawned tick loop.
    handle: tokio::task::JoinHandle<()>,
}

/// Single-slot ticker: at most one tick loop at a time; starting a new
/// one replaces the old.
pub struct Ticker {
    /// The active loop, if any.
    entry: Mutex<Option<TickerEntry>>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker {
    pub fn new() -> Self {
        Self {
            entry: Mutex::new(None),
        }
    }

    /// Whether a tick loop is currently running.
    pub fn is_active(&self) -> bool {
        self.entry
            .lock()
            .as_ref()
            .is_some_and(|e| !e.handle.is_finished())
    }

    /// Start (or replace) the tick loop. `on_tick` returns `false` to
    /// stop the loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&self, initial: Duration, interval: Duration, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.stop();

        let token = CancellationToken::new();
        let cancel = token.clone();

        let fut = async move {
            trace!(
                init_ms = initial.as_millis(),
                int_ms = interval.as_millis(),
                "ticker_start"
            );

            // Initial delay with cancellation
            tokio::select! {
                _ = time::sleep(initial) => {}
                _ = cancel.cancelled() => {
                    trace!("ticker_cancelled_initial");
                    return;
                }
            }

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        trace!("ticker_cancelled");
                        return;
                    }
                    _ = ticker.tick() => {
                        if !on_tick() {
                            trace!("ticker_finished");
                            return;
                        }
                    }
                }
            }
        };

        let handle = tokio::spawn(fut);
        *self.entry.lock() = Some(TickerEntry { token, handle });
    }

    /// Stop the tick loop if present (non-blocking).
    pub fn stop(&self) {
        if let Some(entry) = self.entry.lock().take() {
            entry.token.cancel();
            // Don't abort the handle, let it cancel gracefully via the token
            trace!("ticker_stop");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_on_cadence_until_stopped() {
        let ticker = Ticker::new();
        let count = Arc::new(AtomicUsize::new(0));
        let n = count.clone();
        ticker.start(Duration::from_millis(25), Duration::from_millis(25), move || {
            n.fetch_add(1, Ordering::SeqCst);
            true
        });
        assert!(ticker.is_active());

        time::sleep(Duration::from_millis(110)).await;
        // First tick at 25ms, then every 25ms: 25/50/75/100.
        assert_eq!(count.load(Ordering::SeqCst), 4);

        ticker.stop();
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert!(!ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn tick_returning_false_ends_the_loop() {
        let ticker = Ticker::new();
        let count = Arc::new(AtomicUsize::new(0));
        let n = count.clone();
        ticker.start(Duration::from_millis(25), Duration::from_millis(25), move || {
            n.fetch_add(1, Ordering::SeqCst) < 1
        });

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_previous_loop() {
        let ticker = Ticker::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let n = first.clone();
        ticker.start(Duration::from_millis(10), Duration::from_millis(10), move || {
            n.fetch_add(1, Ordering::SeqCst);
            true
        });
        let n = second.clone();
        ticker.start(Duration::from_millis(10), Duration::from_millis(10), move || {
            n.fetch_add(1, Ordering::SeqCst);
            true
        });

        time::sleep(Duration::from_millis(55)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert!(second.load(Ordering::SeqCst) >= 4);
    }
}
