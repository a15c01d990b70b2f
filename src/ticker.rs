// src/ticker.rs - Periodic due-check signal source
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use log::{info, warn};
use tokio::sync::mpsc;
use tokio::time::{self, Duration, Instant};

/// Cadence of the background ticker thread.
pub const BACKGROUND_TICK: Duration = Duration::from_secs(5);

/// Coarser cadence of the foreground fallback timer.
pub const FOREGROUND_TICK: Duration = Duration::from_secs(15);

/// How often the background thread checks for a stop request while
/// waiting out its interval, so shutdown stays prompt.
const STOP_POLL: Duration = Duration::from_millis(50);

/// The periodic "check now" signal.
#[derive(Debug, Clone, Copy)]
pub struct Tick;

/// Emits a periodic tick that drives the due-check pass.
///
/// Preferred mode runs a dedicated OS thread that posts ticks over a
/// channel, so the cadence holds even while the foreground task is busy.
/// If the thread cannot be spawned, the foreground task falls back to a
/// plain interval at a coarser cadence. The mode is chosen once at
/// startup and never switches at runtime.
pub enum Ticker {
    Background {
        tick_rx: mpsc::Receiver<Tick>,
        stop: Arc<AtomicBool>,
        handle: Option<thread::JoinHandle<()>>,
    },
    Foreground {
        interval: time::Interval,
    },
}

impl Ticker {
    /// Starts the ticker, preferring the background thread.
    pub fn start(background_interval: Duration, fallback_interval: Duration) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel(1);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let spawned = thread::Builder::new()
            .name("pillbox-ticker".to_string())
            .spawn(move || {
                let slice = STOP_POLL.min(background_interval);
                loop {
                    // Wait out the interval in short slices so a stop
                    // request is honored promptly
                    let mut slept = Duration::ZERO;
                    while slept < background_interval {
                        thread::sleep(slice);
                        slept += slice;
                        if thread_stop.load(Ordering::Relaxed) {
                            return;
                        }
                    }
                    match tick_tx.try_send(Tick) {
                        Ok(()) => {}
                        // Consumer is busy; this tick coalesces with the next
                        Err(mpsc::error::TrySendError::Full(_)) => {}
                        Err(mpsc::error::TrySendError::Closed(_)) => return,
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                info!(
                    "Ticker running on background thread, interval {:?}",
                    background_interval
                );
                Ticker::Background {
                    tick_rx,
                    stop,
                    handle: Some(handle),
                }
            }
            Err(e) => {
                warn!(
                    "Ticker thread unavailable ({}), falling back to foreground timer at {:?}",
                    e, fallback_interval
                );
                Self::foreground(fallback_interval)
            }
        }
    }

    /// Builds a foreground-mode ticker directly.
    pub fn foreground(interval: Duration) -> Self {
        // Skip the immediate first tick so the cadence starts one full
        // interval from now
        let interval = time::interval_at(Instant::now() + interval, interval);
        Ticker::Foreground { interval }
    }

    /// Waits for the next tick signal.
    pub async fn tick(&mut self) -> Tick {
        match self {
            Ticker::Background { tick_rx, .. } => match tick_rx.recv().await {
                Some(tick) => tick,
                None => {
                    // Ticker thread exited; degrade to sleeping in place
                    // rather than spinning
                    warn!("Ticker channel closed, sleeping one interval");
                    time::sleep(BACKGROUND_TICK).await;
                    Tick
                }
            },
            Ticker::Foreground { interval } => {
                interval.tick().await;
                Tick
            }
        }
    }

    /// Stops the background thread, if any. Safe to call in either mode.
    pub fn stop(&mut self) {
        if let Ticker::Background { stop, handle, .. } = self {
            stop.store(true, Ordering::Relaxed);
            if let Some(handle) = handle.take() {
                if handle.join().is_err() {
                    warn!("Ticker thread panicked before shutdown");
                }
            }
            info!("Ticker stopped");
        }
    }
}
