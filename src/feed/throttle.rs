//! Leading and trailing edge throttle for scroll handling.

use std::time::Duration;
use tokio::time::Instant;

/// Rate limiter that lets a handler run at most once per `interval`.
///
/// Leading edge: the first call in a quiet period runs immediately.
/// Trailing edge: calls swallowed inside the window are remembered, and
/// [`Throttle::take_trailing`] reports once the window has closed so the
/// caller can run a final time with the latest input.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
    trailing: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            trailing: false,
        }
    }

    /// Returns true if the handler may run now.
    ///
    /// When it may not, the call is recorded as a pending trailing run.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if self.window_open(now) {
            self.last_fired = Some(now);
            self.trailing = false;
            true
        } else {
            self.trailing = true;
            false
        }
    }

    /// Returns true (once) if a swallowed call is due now that the window has closed.
    pub fn take_trailing(&mut self, now: Instant) -> bool {
        if self.trailing && self.window_open(now) {
            self.last_fired = Some(now);
            self.trailing = false;
            true
        } else {
            false
        }
    }

    /// Whether a trailing run is waiting.
    pub fn has_pending(&self) -> bool {
        self.trailing
    }

    /// Forget pending work and history.
    pub fn reset(&mut self) {
        self.last_fired = None;
        self.trailing = false;
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_leading_edge_fires() {
        let mut t = Throttle::new(WINDOW);
        assert!(t.try_fire(Instant::now()));
    }

    #[tokio::test]
    async fn test_calls_inside_window_suppressed() {
        let start = Instant::now();
        let mut t = Throttle::new(WINDOW);
        assert!(t.try_fire(start));
        assert!(!t.try_fire(start + Duration::from_millis(50)));
        assert!(!t.try_fire(start + Duration::from_millis(199)));
        assert!(t.try_fire(start + Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn test_trailing_runs_once_after_window() {
        let start = Instant::now();
        let mut t = Throttle::new(WINDOW);
        t.try_fire(start);
        t.try_fire(start + Duration::from_millis(10));
        t.try_fire(start + Duration::from_millis(20));
        assert!(t.has_pending());

        assert!(!t.take_trailing(start + Duration::from_millis(150)));
        assert!(t.take_trailing(start + Duration::from_millis(210)));
        assert!(!t.take_trailing(start + Duration::from_millis(500)));
    }

    #[tokio::test]
    async fn test_no_trailing_without_suppressed_call() {
        let start = Instant::now();
        let mut t = Throttle::new(WINDOW);
        t.try_fire(start);
        assert!(!t.take_trailing(start + Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_leading_fire_clears_trailing() {
        let start = Instant::now();
        let mut t = Throttle::new(WINDOW);
        t.try_fire(start);
        t.try_fire(start + Duration::from_millis(10));
        assert!(t.try_fire(start + Duration::from_millis(300)));
        assert!(!t.has_pending());
    }

    #[tokio::test]
    async fn test_reset() {
        let start = Instant::now();
        let mut t = Throttle::new(WINDOW);
        t.try_fire(start);
        t.try_fire(start + Duration::from_millis(1));
        t.reset();
        assert!(!t.has_pending());
        assert!(t.try_fire(start + Duration::from_millis(2)));
    }
}
