//! The shared one-second tick.
//!
//! One `Ticker` drives all running timers in lock-step; there is never one
//! interval per timer. The ticking thread is an explicitly owned resource:
//! it starts when the owner asks for it (running-count 0→1), stops when the
//! owner calls [`Ticker::stop`] (running-count back to 0), and is also torn
//! down on Drop so an abandoned owner cannot leak a ticking thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// A tick event. Carries no payload; the receiver advances the timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn the ticking thread, delivering one `Tick` per `interval` on the
    /// returned channel. Ticks that the receiver hasn't drained yet are
    /// coalesced rather than queued (bounded channel, capacity 1) — after a
    /// stall the receiver sees at most one pending tick, not a burst.
    pub fn start(interval: Duration) -> (Self, Receiver<Tick>) {
        let (tx, rx): (SyncSender<Tick>, Receiver<Tick>) = std::sync::mpsc::sync_channel(1);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            if stop_flag.load(Ordering::Relaxed) {
                break;
            }
            match tx.try_send(Tick) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                // Receiver gone; nothing left to tick for
                Err(TrySendError::Disconnected(_)) => break,
            }
        });

        (
            Self {
                stop,
                handle: Some(handle),
            },
            rx,
        )
    }

    /// Stop the ticking thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Block for the next tick, or return None once the ticker is gone.
pub fn wait_tick(rx: &Receiver<Tick>, timeout: Duration) -> Option<Tick> {
    match rx.recv_timeout(timeout) {
        Ok(tick) => Some(tick),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
