//! Scan scheduler: at most one in-flight job per scan type

use crate::jobs::context::ScanContext;
use crate::jobs::handlers;
use crate::jobs::types::{ScanStart, StartedScan};
use crate::models::{JobStatus, ScanType};
use std::sync::Arc;
use tracing::{error, info};

/// Starts scan jobs as independent tasks.
///
/// Starting a scan type that already has a queued or running job is a
/// no-op that hands back the existing job id.
#[derive(Clone)]
pub struct ScanScheduler {
    ctx: Arc<ScanContext>,
}

impl ScanScheduler {
    pub fn new(ctx: Arc<ScanContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<ScanContext> {
        &self.ctx
    }

    /// Start a scan, or return the in-flight job for the same type.
    pub async fn start_scan(&self, scan_type: ScanType) -> StartedScan {
        let job_id = match self.ctx.store.begin(scan_type).await {
            ScanStart::AlreadyRunning(job_id) => {
                info!(
                    job_id = %job_id,
                    scan_type = %scan_type,
                    "ScanScheduler: {} already in flight as {}",
                    scan_type,
                    job_id
                );
                return StartedScan {
                    job_id,
                    scan_type,
                    already_running: true,
                };
            }
            ScanStart::Created(job_id) => job_id,
        };

        if let Some(ref metrics) = self.ctx.metrics {
            metrics
                .scans_started_total
                .with_label_values(&[scan_type.as_str()])
                .inc();
            metrics
                .scans_running
                .with_label_values(&[scan_type.as_str()])
                .inc();
        }

        info!(
            job_id = %job_id,
            scan_type = %scan_type,
            "ScanScheduler: queued {} scan {}",
            scan_type,
            job_id
        );

        let ctx = self.ctx.clone();
        let run_id = job_id.clone();
        tokio::spawn(async move {
            let run = tokio::spawn(handlers::run_scan(ctx.clone(), run_id.clone(), scan_type));

            if let Err(e) = run.await {
                error!(
                    job_id = %run_id,
                    scan_type = %scan_type,
                    error = %e,
                    "ScanScheduler: scan task for {} aborted",
                    run_id
                );
                ctx.store
                    .fail(&run_id, format!("internal error: scan task aborted: {}", e))
                    .await;
            }

            if let Some(ref metrics) = ctx.metrics {
                let status = ctx
                    .store
                    .get_status(&run_id)
                    .await
                    .map(|s| s.status)
                    .unwrap_or(JobStatus::Completed);
                metrics
                    .scans_running
                    .with_label_values(&[scan_type.as_str()])
                    .dec();
                metrics
                    .scans_finished_total
                    .with_label_values(&[scan_type.as_str(), &status.to_string()])
                    .inc();
            }
        });

        StartedScan {
            job_id,
            scan_type,
            already_running: false,
        }
    }
}
