use std::time::{Duration, Instant};

/// Coalesces bursts of notifications into a single firing after a quiet delay.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Restart the delay, replacing any pending deadline.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Time left until the pending deadline, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true exactly once when the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    #[test]
    fn test_fires_once_after_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.notify(t0);
        assert!(!d.fire(t0 + Duration::from_millis(199)));
        assert!(d.fire(t0 + DELAY));
        assert!(!d.fire(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_new_notification_postpones() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.notify(t0);
        d.notify(t0 + Duration::from_millis(150));
        assert!(!d.fire(t0 + Duration::from_millis(250)));
        assert_eq!(
            d.remaining(t0 + Duration::from_millis(250)),
            Some(Duration::from_millis(100))
        );
        assert!(d.fire(t0 + Duration::from_millis(350)));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.notify(t0);
        d.cancel();
        assert!(d.remaining(t0).is_none());
        assert!(!d.fire(t0 + DELAY));
    }
}
