//! Provider-wide request pacing.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces request starts at least `1 / requests_per_second` apart.
///
/// One pacer is shared by every scan and by on-demand analysis, since the
/// upstream limit applies to the whole process.
pub struct RatePacer {
    interval: Option<Duration>,
    next_slot: Mutex<Instant>,
}

impl RatePacer {
    /// `requests_per_second <= 0` (or non-finite) disables pacing.
    pub fn new(requests_per_second: f64) -> Self {
        let interval = (requests_per_second.is_finite() && requests_per_second > 0.0)
            .then(|| Duration::from_secs_f64(1.0 / requests_per_second));
        Self {
            interval,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0.0)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Wait for the next free slot.
    pub async fn acquire(&self) {
        let Some(interval) = self.interval else {
            return;
        };

        let wait = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = (*next).max(now);
            *next = slot + interval;
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}
