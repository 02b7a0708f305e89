//! Scan run handlers
//!
//! A run resolves the universe, then evaluates every symbol with bounded
//! parallelism. Per-symbol failures are logged, counted and recorded as
//! "no match"; only universe resolution can fail the job.

use crate::error::ScanError;
use crate::jobs::context::ScanContext;
use crate::models::ScanType;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

const PROGRESS_LOG_EVERY: usize = 25;

/// Evaluate one symbol and record the outcome on the job.
///
/// Returns whether the symbol matched.
pub async fn handle_symbol(
    ctx: &ScanContext,
    job_id: &str,
    scan_type: ScanType,
    symbol: &str,
) -> bool {
    let scan_label = scan_type.as_str();

    let outcome = match ctx.engine.evaluate(scan_type, symbol).await {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!(
                job_id = %job_id,
                symbol = %symbol,
                kind = e.kind(),
                error = %e,
                "{}: skipping {}: {}",
                scan_label,
                symbol,
                e
            );
            if let Some(ref metrics) = ctx.metrics {
                metrics
                    .scan_symbol_failures_total
                    .with_label_values(&[scan_label, e.kind()])
                    .inc();
            }
            None
        }
    };

    let matched = outcome.is_some();
    if matched {
        info!(
            job_id = %job_id,
            symbol = %symbol,
            scan_type = %scan_type,
            "{}: {} matched",
            scan_label,
            symbol
        );
        if let Some(ref metrics) = ctx.metrics {
            metrics
                .scan_matches_total
                .with_label_values(&[scan_label])
                .inc();
        }
    }

    if let Some(ref metrics) = ctx.metrics {
        metrics
            .scan_symbols_processed_total
            .with_label_values(&[scan_label])
            .inc();
    }

    ctx.store.record(job_id, outcome).await;
    matched
}

/// Run a scan job to completion.
pub async fn run_scan(ctx: Arc<ScanContext>, job_id: String, scan_type: ScanType) {
    let start = Instant::now();

    let symbols = match ctx.universe.list_symbols(scan_type).await {
        Ok(symbols) => symbols,
        Err(e) => {
            let err = ScanError::from(e);
            error!(
                job_id = %job_id,
                scan_type = %scan_type,
                error = %err,
                "{}: scan failed: {}",
                scan_type,
                err
            );
            ctx.store.fail(&job_id, err.to_string()).await;
            return;
        }
    };

    let total = symbols.len();
    ctx.store.mark_running(&job_id, total).await;
    info!(
        job_id = %job_id,
        scan_type = %scan_type,
        total = total,
        workers = ctx.workers,
        "{}: scanning {} symbols",
        scan_type,
        total
    );

    let mut processed = 0usize;
    let mut matches = 0usize;
    let mut evaluations = stream::iter(symbols)
        .map(|symbol| {
            let ctx = ctx.clone();
            let job_id = job_id.clone();
            async move { handle_symbol(&ctx, &job_id, scan_type, &symbol).await }
        })
        .buffer_unordered(ctx.workers);

    while let Some(matched) = evaluations.next().await {
        processed += 1;
        if matched {
            matches += 1;
        }
        if processed % PROGRESS_LOG_EVERY == 0 {
            info!(
                job_id = %job_id,
                processed = processed,
                total = total,
                matches = matches,
                "{}: progress {}/{} ({} matched)",
                scan_type,
                processed,
                total,
                matches
            );
        }
    }

    ctx.store.complete(&job_id).await;
    info!(
        job_id = %job_id,
        scan_type = %scan_type,
        total = total,
        matches = matches,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "{}: scan complete, {} of {} symbols matched",
        scan_type,
        matches,
        total
    );
}
