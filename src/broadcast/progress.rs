use async_trait::async_trait;

/// Final tally of a broadcast job.
///
/// `delivered + unreachable + failed + abandoned == total` once the job ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients in the snapshot taken at job start
    pub total: usize,
    pub delivered: usize,
    /// Blocked or deactivated; removed from the directory
    pub unreachable: usize,
    pub failed: usize,
    /// Gave up after too many consecutive throttle signals
    pub abandoned: usize,
    pub throttle_events: u64,
}

impl BroadcastReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Everything that was not delivered.
    pub fn not_delivered(&self) -> usize {
        self.total.saturating_sub(self.delivered)
    }

    pub fn is_balanced(&self) -> bool {
        self.delivered + self.unreachable + self.failed + self.abandoned == self.total
    }
}

/// Receives progress updates of a running broadcast.
///
/// Implementations log their own errors; a reporter can never stop a job.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// Called once with the size of the recipient snapshot.
    async fn started(&self, total: usize);

    async fn progress(&self, delivered: usize, total: usize);

    async fn finished(&self, report: &BroadcastReport);
}

pub fn started_text(total: usize) -> String {
    format!("📤 Broadcasting to {} users...", total)
}

pub fn progress_text(delivered: usize, total: usize) -> String {
    format!("📤 Broadcast progress: {}/{}", delivered, total)
}

pub fn summary_text(report: &BroadcastReport) -> String {
    let mut text = format!(
        "✅ Broadcast completed!\nSuccess: {}\nFailed: {}",
        report.delivered,
        report.not_delivered()
    );
    if report.not_delivered() > 0 || report.throttle_events > 0 {
        text.push_str(&format!(
            "\n\nRemoved (blocked/deactivated): {}\nErrors: {}",
            report.unreachable, report.failed
        ));
        if report.abandoned > 0 {
            text.push_str(&format!("\nGave up after throttling: {}", report.abandoned));
        }
        if report.throttle_events > 0 {
            text.push_str(&format!("\nFlood waits: {}", report.throttle_events));
        }
    }
    text
}
