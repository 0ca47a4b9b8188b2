use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::domain::{RunId, RunStatus, TestResponse};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("a run with id {0} is already registered; retry in a second")]
    Duplicate(String),
}

#[derive(Debug, Clone)]
struct JobEntry {
    seq: u64,
    response: TestResponse,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    jobs: HashMap<RunId, JobEntry>,
}

impl Inner {
    /// Drops the oldest finished jobs until at most `limit` remain.
    /// Pending jobs are never dropped, so the table can exceed `limit`
    /// while that many runs are still in flight.
    fn evict_finished(&mut self, limit: usize) {
        let excess = self.jobs.len().saturating_sub(limit);
        if excess == 0 {
            return;
        }

        let mut finished: Vec<(u64, RunId)> = self
            .jobs
            .iter()
            .filter(|(_, e)| e.response.status != RunStatus::Pending)
            .map(|(id, e)| (e.seq, id.clone()))
            .collect();
        finished.sort_unstable_by_key(|(seq, _)| *seq);

        for (_, run_id) in finished.into_iter().take(excess) {
            debug!(run_id = %run_id, "evicting finished job");
            self.jobs.remove(&run_id);
        }
    }
}

/// In-memory status table for submitted runs. Lost on restart.
#[derive(Debug, Default)]
pub struct JobRegistry {
    inner: RwLock<Inner>,
    /// `0` keeps every job.
    max_tracked: usize,
}

impl JobRegistry {
    pub fn new(max_tracked: usize) -> Self {
        Self {
            inner: RwLock::default(),
            max_tracked,
        }
    }

    /// Registers `run_id` as pending and returns the acceptance response.
    pub fn register(&self, run_id: &RunId) -> Result<TestResponse, JobError> {
        let mut inner = self.inner.write();
        if inner.jobs.contains_key(run_id) {
            return Err(JobError::Duplicate(run_id.to_string()));
        }

        let response = TestResponse::accepted(run_id, "Test queued. Poll the job for its status.");
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.jobs.insert(
            run_id.clone(),
            JobEntry {
                seq,
                response: response.clone(),
            },
        );
        if self.max_tracked > 0 {
            inner.evict_finished(self.max_tracked);
        }
        Ok(response)
    }

    /// Records the final state. Unknown ids are ignored.
    pub fn complete(&self, run_id: &RunId, response: TestResponse) {
        let mut inner = self.inner.write();
        if let Some(entry) = inner.jobs.get_mut(run_id) {
            entry.response = response;
        }
        if self.max_tracked > 0 {
            inner.evict_finished(self.max_tracked);
        }
    }

    pub fn get(&self, run_id: &RunId) -> Option<TestResponse> {
        self.inner.read().jobs.get(run_id).map(|e| e.response.clone())
    }

    /// Most recent submission first.
    pub fn list(&self) -> Vec<TestResponse> {
        let inner = self.inner.read();
        let mut entries: Vec<&JobEntry> = inner.jobs.values().collect();
        entries.sort_by(|a, b| b.seq.cmp(&a.seq));
        entries.into_iter().map(|e| e.response.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
