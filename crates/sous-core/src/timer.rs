//! Countdown timers for a cooking session.
//!
//! All running timers advance together, one second per tick, from a single
//! consistent snapshot — there is no per-timer interval. The functions here
//! are pure list transformations; the completion chime is the caller's job,
//! driven by the ids returned from [`tick`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TimerInstance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerInstance {
    pub id: Uuid,
    pub label: String,
    /// Fixed duration set at creation.
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub running: bool,
}

impl TimerInstance {
    pub fn new(total_seconds: u32, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            total_seconds,
            remaining_seconds: total_seconds,
            // A zero-duration timer is born finished; it must never run
            running: total_seconds > 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_seconds == 0
    }
}

// ---------------------------------------------------------------------------
// List operations
// ---------------------------------------------------------------------------

/// Advance every running timer by one second.
///
/// Returns the ids of timers that crossed zero on this tick — each id is
/// reported exactly once, on the crossing tick. Finished timers have
/// `running` forced to false so later ticks leave them untouched.
pub fn tick(timers: &mut [TimerInstance]) -> Vec<Uuid> {
    let mut completed = Vec::new();
    for timer in timers.iter_mut() {
        if !timer.running || timer.remaining_seconds == 0 {
            continue;
        }
        timer.remaining_seconds -= 1;
        if timer.remaining_seconds == 0 {
            timer.running = false;
            completed.push(timer.id);
        }
    }
    completed
}

/// Flip `running` for the matching timer. A finished timer cannot be
/// resumed; toggling it is a no-op. Returns false if no timer matched.
pub fn toggle(timers: &mut [TimerInstance], id: Uuid) -> bool {
    match timers.iter_mut().find(|t| t.id == id) {
        Some(t) => {
            if !t.is_finished() {
                t.running = !t.running;
            }
            true
        }
        None => false,
    }
}

/// Restore the matching timer to its full duration, paused.
pub fn reset(timers: &mut [TimerInstance], id: Uuid) -> bool {
    match timers.iter_mut().find(|t| t.id == id) {
        Some(t) => {
            t.remaining_seconds = t.total_seconds;
            t.running = false;
            true
        }
        None => false,
    }
}

/// Delete the matching timer. Returns false if no timer matched.
pub fn remove(timers: &mut Vec<TimerInstance>, id: Uuid) -> bool {
    let before = timers.len();
    timers.retain(|t| t.id != id);
    timers.len() != before
}

/// Append a new running timer and return its id.
pub fn add(timers: &mut Vec<TimerInstance>, total_seconds: u32, label: impl Into<String>) -> Uuid {
    let timer = TimerInstance::new(total_seconds, label);
    let id = timer.id;
    timers.push(timer);
    id
}

pub fn running_count(timers: &[TimerInstance]) -> usize {
    timers.iter().filter(|t| t.running).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
