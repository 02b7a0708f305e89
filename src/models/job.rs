//! Scan job lifecycle types.

use crate::error::ScanError;
use crate::models::{SignalResult, Timeframe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    EmaDaily,
    EmaWeekly,
    Sma50,
}

impl ScanType {
    pub const ALL: [ScanType; 3] = [ScanType::EmaDaily, ScanType::EmaWeekly, ScanType::Sma50];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::EmaDaily => "ema_daily",
            ScanType::EmaWeekly => "ema_weekly",
            ScanType::Sma50 => "sma50",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScanType::EmaDaily => "EMA Daily",
            ScanType::EmaWeekly => "EMA Weekly",
            ScanType::Sma50 => "SMA50 Multi-TF",
        }
    }

    /// Timeframes fetched per symbol.
    pub fn timeframes(&self) -> &'static [Timeframe] {
        match self {
            ScanType::EmaDaily => &[Timeframe::Daily],
            ScanType::EmaWeekly => &[Timeframe::Weekly],
            ScanType::Sma50 => &[
                Timeframe::Daily,
                Timeframe::Hourly,
                Timeframe::FifteenMinute,
            ],
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanType {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ema_daily" => Ok(ScanType::EmaDaily),
            "ema_weekly" => Ok(ScanType::EmaWeekly),
            "sma50" => Ok(ScanType::Sma50),
            other => Err(ScanError::UnknownScanType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Queued and running jobs hold the per-scan-type slot.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    pub fn is_finished(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// `round(processed / total * 100)`, 0 for an empty universe.
pub fn percent_of(processed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((processed as f64 / total as f64) * 100.0).round().min(100.0) as u32
}

/// A long-running scan over the symbol universe.
#[derive(Debug, Clone, Serialize)]
pub struct ScanJob {
    pub job_id: String,
    pub scan_type: ScanType,
    pub label: String,
    pub status: JobStatus,
    pub total: usize,
    pub processed: usize,
    pub percent: u32,
    pub results: Vec<SignalResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScanJob {
    pub fn new(scan_type: ScanType) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            scan_type,
            label: scan_type.label().to_string(),
            status: JobStatus::Queued,
            total: 0,
            processed: 0,
            percent: 0,
            results: Vec::new(),
            error: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn start(&mut self, total: usize) {
        self.status = JobStatus::Running;
        self.total = total;
        self.processed = 0;
        self.percent = 0;
        self.started_at = Some(Utc::now());
    }

    /// Count one attempted symbol; only matches are retained.
    pub fn record(&mut self, outcome: Option<SignalResult>) {
        if let Some(result) = outcome.filter(SignalResult::matched) {
            self.results.push(result);
        }
        self.processed += 1;
        self.percent = percent_of(self.processed, self.total);
    }

    pub fn complete(&mut self) {
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            job_id: self.job_id.clone(),
            scan_type: self.scan_type,
            label: self.label.clone(),
            status: self.status,
            processed: self.processed,
            total: self.total,
            percent: self.percent,
            results_count: self.results.len(),
            results: self.results.clone(),
            error: self.error.clone(),
            created_at: self.created_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            job_id: self.job_id.clone(),
            scan_type: self.scan_type,
            label: self.label.clone(),
            status: self.status,
            percent: self.percent,
            results_count: self.results.len(),
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }
}

/// Point-in-time copy of a job, safe to hand out while the scan continues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub scan_type: ScanType,
    pub label: String,
    pub status: JobStatus,
    pub processed: usize,
    pub total: usize,
    pub percent: u32,
    pub results_count: usize,
    pub results: Vec<SignalResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub scan_type: ScanType,
    pub label: String,
    pub status: JobStatus,
    pub percent: u32,
    pub results_count: usize,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Most recent completed result set for one scan type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestResults {
    pub scan_type: ScanType,
    pub label: String,
    pub job_id: String,
    pub completed_at: DateTime<Utc>,
    pub total_scanned: usize,
    pub results_count: usize,
    pub results: Vec<SignalResult>,
}

impl LatestResults {
    pub fn from_job(job: &ScanJob) -> Self {
        Self {
            scan_type: job.scan_type,
            label: job.label.clone(),
            job_id: job.job_id.clone(),
            completed_at: job.completed_at.unwrap_or_else(Utc::now),
            total_scanned: job.processed,
            results_count: job.results.len(),
            results: job.results.clone(),
        }
    }
}
