//! Politeness throttle
//!
//! The harvester talks to a single remote source from a single task, so one
//! throttle enforces the minimum pause between any two requests. The pause is
//! measured from the end of one request to the start of the next.

use std::time::{Duration, Instant};

/// Enforces a minimum delay between consecutive requests
#[derive(Debug, Clone)]
pub struct Throttle {
    min_delay: Duration,
    last_request_time: Option<Instant>,
}

impl Throttle {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request_time: None,
        }
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_delay {
            Some(self.min_delay - elapsed)
        } else {
            None
        }
    }

    /// Records that a request finished at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.last_request_time = Some(now);
    }

    /// Sleeps until a request is allowed
    ///
    /// Call [`record_request`](Self::record_request) once the request is done.
    pub async fn wait(&self) {
        if let Some(delay) = self.time_until_next_request(Instant::now()) {
            tracing::trace!("Politeness delay: sleeping {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }
}
