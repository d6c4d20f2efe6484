//! Timer-completion cue.
//!
//! Strictly best-effort: an environment without a usable terminal (or with
//! sound disabled) degrades to silence, never to an error. The countdown
//! itself is unaffected either way.

use std::io::Write;

pub trait Chime {
    /// Play the completion cue once. Must not fail or block the countdown.
    fn ring(&self);
}

/// Short multi-beep via the terminal bell.
pub struct TerminalBell {
    beeps: u8,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self { beeps: 3 }
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new()
    }
}

impl Chime for TerminalBell {
    fn ring(&self) {
        let mut out = std::io::stderr();
        for _ in 0..self.beeps {
            if out.write_all(b"\x07").is_err() {
                tracing::debug!("terminal bell unavailable; skipping chime");
                return;
            }
        }
        let _ = out.flush();
    }
}

/// No-op chime for muted kitchens and tests.
pub struct Silent;

impl Chime for Silent {
    fn ring(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Test double that counts rings.
    pub struct Counting(pub Arc<AtomicUsize>);

    impl Chime for Counting {
        fn ring(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn silent_and_bell_never_panic() {
        Silent.ring();
        TerminalBell::new().ring();
    }

    #[test]
    fn counting_double_counts() {
        let count = Arc::new(AtomicUsize::new(0));
        let chime = Counting(count.clone());
        chime.ring();
        chime.ring();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
