//! Test doubles for the broadcast seams
//!
//! Shared across integration tests; not every test uses every item.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::{Duration, Instant};

use filelink::broadcast::{BroadcastReport, BroadcastTransport, DeliveryOutcome, ProgressReporter, UserDirectory};
use filelink::AppResult;

/// In-memory user directory.
#[derive(Clone, Default)]
pub struct MockDirectory {
    users: Arc<Mutex<BTreeSet<i64>>>,
    deletes: Arc<Mutex<Vec<i64>>>,
}

impl MockDirectory {
    pub fn with_users(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            users: Arc::new(Mutex::new(ids.into_iter().collect())),
            deletes: Arc::default(),
        }
    }

    pub fn add(&self, id: i64) {
        self.users.lock().unwrap().insert(id);
    }

    pub fn contains(&self, id: i64) -> bool {
        self.users.lock().unwrap().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn deletes(&self) -> Vec<i64> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for MockDirectory {
    async fn list_all_user_ids(&self) -> AppResult<Vec<i64>> {
        Ok(self.users.lock().unwrap().iter().copied().collect())
    }

    async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        self.deletes.lock().unwrap().push(user_id);
        self.users.lock().unwrap().remove(&user_id);
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.lock().unwrap().len() as u64)
    }
}

/// One recorded send attempt.
#[derive(Debug, Clone, Copy)]
pub struct Attempt {
    pub recipient: i64,
    pub at: Instant,
}

/// Transport that answers from a per-recipient script and delivers
/// everything else.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<HashMap<i64, VecDeque<DeliveryOutcome>>>>,
    attempts: Arc<Mutex<Vec<Attempt>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues outcomes for `recipient`; once exhausted it is delivered.
    pub fn script(self, recipient: i64, outcomes: impl IntoIterator<Item = DeliveryOutcome>) -> Self {
        self.script
            .lock()
            .unwrap()
            .entry(recipient)
            .or_default()
            .extend(outcomes);
        self
    }

    /// Throttles `recipient` the given number of times.
    pub fn always_throttle(self, recipient: i64, wait: Duration, times: usize) -> Self {
        self.script(recipient, std::iter::repeat(DeliveryOutcome::Throttled(wait)).take(times))
    }

    pub fn attempts(&self) -> Vec<Attempt> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<i64> {
        self.attempts().iter().map(|a| a.recipient).collect()
    }
}

#[async_trait]
impl BroadcastTransport for ScriptedTransport {
    async fn copy_to(&self, recipient: i64) -> DeliveryOutcome {
        self.attempts.lock().unwrap().push(Attempt {
            recipient,
            at: Instant::now(),
        });
        self.script
            .lock()
            .unwrap()
            .get_mut(&recipient)
            .and_then(VecDeque::pop_front)
            .unwrap_or(DeliveryOutcome::Delivered)
    }
}

/// Records the start total, every progress call and the final report.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    started: Arc<Mutex<Option<usize>>>,
    progress: Arc<Mutex<Vec<(usize, usize)>>>,
    finished: Arc<Mutex<Option<BroadcastReport>>>,
}

impl RecordingReporter {
    pub fn started(&self) -> Option<usize> {
        *self.started.lock().unwrap()
    }

    pub fn progress_calls(&self) -> Vec<(usize, usize)> {
        self.progress.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Option<BroadcastReport> {
        self.finished.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressReporter for RecordingReporter {
    async fn started(&self, total: usize) {
        *self.started.lock().unwrap() = Some(total);
    }

    async fn progress(&self, delivered: usize, total: usize) {
        self.progress.lock().unwrap().push((delivered, total));
    }

    async fn finished(&self, report: &BroadcastReport) {
        *self.finished.lock().unwrap() = Some(report.clone());
    }
}
