use crate::broadcast::directory::UserDirectory;
use crate::broadcast::outcome::{BroadcastTransport, DeliveryOutcome};
use crate::broadcast::progress::{BroadcastReport, ProgressReporter};
use crate::core::config;
use crate::core::error::AppResult;
use crate::core::rate_limiter::RateLimiter;

/// Copies one template message to every user in the directory.
///
/// Recipients are handled strictly one after another. Throttled sends are
/// retried against the same recipient after the requested wait; unreachable
/// recipients are deleted from the directory; other failures are logged and
/// skipped. No per-recipient error aborts the job.
pub struct BroadcastEngine<D, T, P> {
    directory: D,
    transport: T,
    reporter: P,
    progress_every: usize,
    max_throttle_retries: Option<u32>,
}

impl<D, T, P> BroadcastEngine<D, T, P>
where
    D: UserDirectory,
    T: BroadcastTransport,
    P: ProgressReporter,
{
    pub fn new(directory: D, transport: T, reporter: P) -> Self {
        Self {
            directory,
            transport,
            reporter,
            progress_every: config::broadcast::PROGRESS_EVERY,
            max_throttle_retries: None,
        }
    }

    /// Report progress each time this many deliveries have succeeded.
    pub fn progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }

    /// Give up on a recipient after `cap` consecutive throttle signals.
    /// `None` retries forever.
    pub fn max_throttle_retries(mut self, cap: Option<u32>) -> Self {
        self.max_throttle_retries = cap;
        self
    }

    /// Runs the job to completion.
    ///
    /// Only a failure to read the recipient list is returned as an error.
    pub async fn run(self) -> AppResult<BroadcastReport> {
        let recipients = self.directory.list_all_user_ids().await?;
        let mut report = BroadcastReport::new(recipients.len());
        let mut limiter = RateLimiter::new();

        log::info!("📣 Broadcast started: {} recipients", report.total);
        self.reporter.started(report.total).await;

        for user_id in recipients {
            self.deliver(user_id, &mut limiter, &mut report).await;
        }

        report.throttle_events = limiter.throttle_events();
        log::info!(
            "📣 Broadcast finished: delivered={} unreachable={} failed={} abandoned={} throttled={}",
            report.delivered,
            report.unreachable,
            report.failed,
            report.abandoned,
            report.throttle_events
        );
        self.reporter.finished(&report).await;

        Ok(report)
    }

    async fn deliver(&self, user_id: i64, limiter: &mut RateLimiter, report: &mut BroadcastReport) {
        let mut throttled = 0u32;

        loop {
            limiter.wait_ready().await;

            match self.transport.copy_to(user_id).await {
                DeliveryOutcome::Delivered => {
                    report.delivered += 1;
                    if report.delivered % self.progress_every == 0 {
                        self.reporter.progress(report.delivered, report.total).await;
                    }
                    return;
                }
                DeliveryOutcome::Throttled(wait) => {
                    throttled += 1;
                    if self.max_throttle_retries.is_some_and(|cap| throttled > cap) {
                        log::warn!(
                            "Giving up on user {} after {} throttle signals",
                            user_id,
                            throttled
                        );
                        limiter.record_signal(wait);
                        report.abandoned += 1;
                        return;
                    }
                    limiter.on_throttle_signal(wait).await;
                }
                DeliveryOutcome::Unreachable => {
                    log::info!("🚫 User {} is unreachable, removing", user_id);
                    if let Err(e) = self.directory.delete_user(user_id).await {
                        log::error!("Failed to delete unreachable user {}: {}", user_id, e);
                    }
                    report.unreachable += 1;
                    return;
                }
                DeliveryOutcome::Failed(details) => {
                    log::error!("Broadcast error for {}: {}", user_id, details);
                    report.failed += 1;
                    return;
                }
            }
        }
    }
}
