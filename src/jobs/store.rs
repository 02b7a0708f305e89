//! In-memory job store and latest-results cache.
//!
//! All maps sit behind one `RwLock`, so every read sees `processed`,
//! `percent` and `results` from the same moment. Readers get clones; the
//! latest-results entries are replaced whole behind an `Arc`.

use crate::error::ScanError;
use crate::jobs::types::ScanStart;
use crate::models::{
    JobSnapshot, JobStatus, JobSummary, LatestResults, ScanJob, ScanType, SignalResult,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct StoreState {
    jobs: HashMap<String, ScanJob>,
    in_flight: HashMap<ScanType, String>,
    finished: VecDeque<String>,
    latest: HashMap<ScanType, Arc<LatestResults>>,
}

impl StoreState {
    /// Release the scan-type slot and queue the job for eviction.
    fn finish(&mut self, job_id: &str, scan_type: ScanType, max_retained: usize) {
        if self.in_flight.get(&scan_type).map(String::as_str) == Some(job_id) {
            self.in_flight.remove(&scan_type);
        }
        self.finished.push_back(job_id.to_string());
        while self.finished.len() > max_retained {
            if let Some(evicted) = self.finished.pop_front() {
                debug!(job_id = %evicted, "evicting finished job {}", evicted);
                self.jobs.remove(&evicted);
            }
        }
    }
}

pub struct JobStore {
    state: RwLock<StoreState>,
    max_retained_jobs: usize,
}

impl JobStore {
    /// Keeps at least the most recently finished job so its poller can
    /// read the outcome.
    pub fn new(max_retained_jobs: usize) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            max_retained_jobs: max_retained_jobs.max(1),
        }
    }

    /// Create a queued job unless one of this type is already queued or running.
    pub async fn begin(&self, scan_type: ScanType) -> ScanStart {
        let mut state = self.state.write().await;
        if let Some(existing) = state.in_flight.get(&scan_type) {
            return ScanStart::AlreadyRunning(existing.clone());
        }

        let job = ScanJob::new(scan_type);
        let job_id = job.job_id.clone();
        state.in_flight.insert(scan_type, job_id.clone());
        state.jobs.insert(job_id.clone(), job);
        ScanStart::Created(job_id)
    }

    pub async fn mark_running(&self, job_id: &str, total: usize) {
        let mut state = self.state.write().await;
        if let Some(job) = state.jobs.get_mut(job_id) {
            if job.status == JobStatus::Queued {
                job.start(total);
            }
        }
    }

    /// Count one attempted symbol, keeping the result if it matched.
    pub async fn record(&self, job_id: &str, outcome: Option<SignalResult>) {
        let mut state = self.state.write().await;
        if let Some(job) = state.jobs.get_mut(job_id) {
            if job.status == JobStatus::Running {
                job.record(outcome);
            }
        }
    }

    /// Mark the job completed and publish its results as the latest for its type.
    pub async fn complete(&self, job_id: &str) -> Option<Arc<LatestResults>> {
        let mut state = self.state.write().await;
        let job = state.jobs.get_mut(job_id)?;
        if job.status != JobStatus::Running {
            return None;
        }
        job.complete();

        let scan_type = job.scan_type;
        let latest = Arc::new(LatestResults::from_job(job));
        state.latest.insert(scan_type, latest.clone());
        state.finish(job_id, scan_type, self.max_retained_jobs);
        Some(latest)
    }

    /// Mark an active job failed. The latest-results cache is left untouched.
    pub async fn fail(&self, job_id: &str, error: impl Into<String>) {
        let mut state = self.state.write().await;
        let Some(job) = state.jobs.get_mut(job_id) else {
            return;
        };
        if !job.status.is_active() {
            return;
        }
        job.fail(error);

        let scan_type = job.scan_type;
        state.finish(job_id, scan_type, self.max_retained_jobs);
    }

    pub async fn get_status(&self, job_id: &str) -> Result<JobSnapshot, ScanError> {
        let state = self.state.read().await;
        state
            .jobs
            .get(job_id)
            .map(ScanJob::snapshot)
            .ok_or_else(|| ScanError::JobNotFound(job_id.to_string()))
    }

    /// Results of a completed job.
    pub async fn get_results(&self, job_id: &str) -> Result<Vec<SignalResult>, ScanError> {
        let state = self.state.read().await;
        let job = state
            .jobs
            .get(job_id)
            .ok_or_else(|| ScanError::JobNotFound(job_id.to_string()))?;

        if job.status != JobStatus::Completed {
            return Err(ScanError::JobNotReady {
                job_id: job_id.to_string(),
                status: job.status,
            });
        }
        Ok(job.results.clone())
    }

    pub async fn get_latest(&self, scan_type: ScanType) -> Option<Arc<LatestResults>> {
        self.state.read().await.latest.get(&scan_type).cloned()
    }

    /// Id of the queued or running job for a scan type.
    pub async fn in_flight(&self, scan_type: ScanType) -> Option<String> {
        self.state.read().await.in_flight.get(&scan_type).cloned()
    }

    /// Summaries of all retained jobs, newest first.
    pub async fn list_jobs(&self) -> Vec<JobSummary> {
        let state = self.state.read().await;
        let mut jobs: Vec<JobSummary> = state.jobs.values().map(ScanJob::summary).collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new(50)
    }
}
