use tokio::time::{Duration, Instant};

/// Back-off state for a broadcast job.
///
/// The messaging transport tells us when we are sending too fast; the limiter
/// remembers the instant at which sending may resume and suspends the caller
/// until then. One limiter belongs to one sequential broadcast worker, so no
/// locking is involved.
#[derive(Debug, Default)]
pub struct RateLimiter {
    /// Earliest instant the next send may happen
    resume_at: Option<Instant>,
    /// Number of throttle signals received so far
    throttle_events: u64,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a throttle signal and suspends for exactly `wait`.
    ///
    /// After this returns the caller retries the same recipient.
    pub async fn on_throttle_signal(&mut self, wait: Duration) {
        let resume_at = self.record_signal(wait);
        log::warn!("⏳ Throttled by Telegram, pausing for {}s", wait.as_secs_f64());
        tokio::time::sleep_until(resume_at).await;
    }

    /// Records a throttle signal without suspending.
    ///
    /// The next [`wait_ready`](Self::wait_ready) still honours the wait.
    pub fn record_signal(&mut self, wait: Duration) -> Instant {
        let resume_at = Instant::now() + wait;
        self.resume_at = Some(resume_at);
        self.throttle_events += 1;
        resume_at
    }

    /// Sleeps until the recorded resume instant if it lies in the future.
    pub async fn wait_ready(&self) {
        if let Some(resume_at) = self.resume_at {
            if resume_at > Instant::now() {
                tokio::time::sleep_until(resume_at).await;
            }
        }
    }

    /// Remaining time until sending may resume, zero if not limited.
    pub fn remaining(&self) -> Duration {
        self.resume_at
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO)
    }

    pub fn resume_at(&self) -> Option<Instant> {
        self.resume_at
    }

    pub fn throttle_events(&self) -> u64 {
        self.throttle_events
    }
}
