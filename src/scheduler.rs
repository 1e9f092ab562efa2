use std::time::{Duration, Instant};

/// A single fire-once action due at a point in time.
///
/// Scheduling again replaces whatever was pending. The owner polls it from
/// its tick handler and must call [`Deferred::cancel`] when it goes away so a
/// stale action is never delivered.
#[derive(Debug)]
pub struct Deferred<A> {
    pending: Option<(Instant, A)>,
}

impl<A> Default for Deferred<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> Deferred<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, action: A) {
        self.pending = Some((now + delay, action));
    }

    /// Returns true if something was pending
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Hands out the action once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        match &self.pending {
            Some((due, _)) if now >= *due => self.pending.take().map(|(_, a)| a),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_before_deadline_is_empty() {
        let start = Instant::now();
        let mut deferred = Deferred::new();
        deferred.schedule(start, Duration::from_millis(1000), "advance");

        assert_eq!(deferred.poll(start + Duration::from_millis(999)), None);
        assert!(deferred.is_pending());
    }

    #[test]
    fn test_poll_fires_once() {
        let start = Instant::now();
        let mut deferred = Deferred::new();
        deferred.schedule(start, Duration::from_millis(1000), "advance");

        let later = start + Duration::from_millis(1000);
        assert_eq!(deferred.poll(later), Some("advance"));
        assert_eq!(deferred.poll(later), None);
        assert!(!deferred.is_pending());
    }

    #[test]
    fn test_cancel_prevents_delivery() {
        let start = Instant::now();
        let mut deferred = Deferred::new();
        deferred.schedule(start, Duration::from_millis(10), 1);

        assert!(deferred.cancel());
        assert!(!deferred.cancel());
        assert_eq!(deferred.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let start = Instant::now();
        let mut deferred = Deferred::new();
        deferred.schedule(start, Duration::from_millis(10), 1);
        deferred.schedule(start, Duration::from_millis(500), 2);

        assert_eq!(deferred.poll(start + Duration::from_millis(20)), None);
        assert_eq!(deferred.poll(start + Duration::from_millis(500)), Some(2));
    }
}
