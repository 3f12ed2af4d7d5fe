//! Back-press debouncing for modal dismissal.
//!
//! Remotes repeat Back aggressively, and closing a nested modal delivers a
//! trailing Back to the parent on some front ends. The guard answers one
//! question - "should this Back close the modal right now?" - using two
//! windows measured at event time:
//!
//! * a plain debounce window between accepted Backs
//! * a suppression window after a child modal closed, so the parent does
//!   not swallow the child's trailing Back and close itself

use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug)]
pub struct BackGuard {
    debounce: Duration,
    child_window: Duration,
    last_back: Option<Instant>,
    last_child_back: Option<Instant>,
}

impl BackGuard {
    pub fn new(debounce: Duration, child_window: Duration) -> Self {
        Self {
            debounce,
            child_window,
            last_back: None,
            last_child_back: None,
        }
    }

    /// Decide whether a Back press at `now` may dismiss this modal. An
    /// allowed press is recorded so the next one debounces against it;
    /// a suppressed press records nothing.
    pub fn allow(&mut self, now: Instant) -> bool {
        if let Some(child) = self.last_child_back {
            if now.duration_since(child) < self.child_window {
                trace!("back suppressed: child modal closed recently");
                return false;
            }
        }
        if let Some(last) = self.last_back {
            if now.duration_since(last) < self.debounce {
                trace!("back suppressed: within debounce window");
                return false;
            }
        }
        self.last_back = Some(now);
        true
    }

    /// Record that a child modal just closed via Back.
    pub fn note_child_back(&mut self, now: Instant) {
        self.last_child_back = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> BackGuard {
        BackGuard::new(Duration::from_millis(500), Duration::from_millis(600))
    }

    #[test]
    fn test_first_back_is_allowed() {
        let mut g = guard();
        assert!(g.allow(Instant::now()));
    }

    #[test]
    fn test_rapid_repeat_is_debounced() {
        let mut g = guard();
        let t0 = Instant::now();
        assert!(g.allow(t0));
        assert!(!g.allow(t0 + Duration::from_millis(200)));
        assert!(g.allow(t0 + Duration::from_millis(700)));
    }

    #[test]
    fn test_suppressed_press_does_not_extend_window() {
        let mut g = guard();
        let t0 = Instant::now();
        assert!(g.allow(t0));
        assert!(!g.allow(t0 + Duration::from_millis(400)));
        // 501ms after the accepted press, not after the suppressed one.
        assert!(g.allow(t0 + Duration::from_millis(501)));
    }

    #[test]
    fn test_child_close_suppresses_trailing_back() {
        let mut g = guard();
        let t0 = Instant::now();
        g.note_child_back(t0);
        assert!(!g.allow(t0 + Duration::from_millis(100)));
        assert!(!g.allow(t0 + Duration::from_millis(599)));
        assert!(g.allow(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn test_child_window_checked_before_debounce() {
        let mut g = guard();
        let t0 = Instant::now();
        assert!(g.allow(t0));
        g.note_child_back(t0 + Duration::from_millis(800));
        // Past the debounce window but inside the child window.
        assert!(!g.allow(t0 + Duration::from_millis(900)));
    }
}
