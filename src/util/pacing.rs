//! Real-time pacing of generated descriptors
//!
//! Generators only compute *when* an I/O is due, as an offset from the start
//! of the run. The pacer turns that offset into a wall-clock wait:
//! `sleep(max(0, start + when - now))`.
//!
//! Descriptors that are already overdue are dispatched immediately; the
//! returned lateness lets callers track how far behind schedule they run.

use std::thread;
use std::time::{Duration, Instant};

/// Wall-clock anchor for one run
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    start: Instant,
}

impl Pacer {
    /// Anchor the run at the current instant
    pub fn start() -> Self {
        Self::with_start(Instant::now())
    }

    /// Anchor the run at a given instant (shared by all contexts of a run)
    pub fn with_start(start: Instant) -> Self {
        Self { start }
    }

    /// Instant the run started
    pub fn start_instant(&self) -> Instant {
        self.start
    }

    /// Wall-clock time since the start of the run
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time left until an I/O scheduled at `when` is due (zero if overdue)
    #[inline]
    pub fn delay_until(&self, when: Duration) -> Duration {
        when.saturating_sub(self.elapsed())
    }

    /// How far past `when` the run currently is (zero if early)
    #[inline]
    pub fn lateness(&self, when: Duration) -> Duration {
        self.elapsed().saturating_sub(when)
    }

    /// Sleep until `when` is due and return the dispatch lateness
    pub fn wait(&self, when: Duration) -> Duration {
        let delay = self.delay_until(when);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.lateness(when)
    }
}
