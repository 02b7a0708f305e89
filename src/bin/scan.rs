//! One-off scan runner
//!
//! Runs a single scan type over the symbol universe through the same
//! scheduler the API uses, then prints each match as a JSON line.

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};
use trendscan::config::Config;
use trendscan::core::runtime::ScanRuntime;
use trendscan::logging;
use trendscan::models::{JobStatus, ScanType};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(name = "scan")]
#[command(about = "Run one trendscan scan and print the matches", long_about = None)]
#[command(version)]
struct Cli {
    /// Scan type: ema_daily, ema_weekly or sma50
    #[arg(value_parser = ScanType::from_str)]
    scan_type: ScanType,

    /// Symbol universe file, one ticker per line
    #[arg(long)]
    symbols_file: Option<PathBuf>,

    /// Concurrent symbol evaluations
    #[arg(long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging();

    let mut config = Config::from_env();
    if let Some(path) = cli.symbols_file {
        config.symbols_file = path;
    }
    if let Some(workers) = cli.workers {
        config.scan.workers = workers.max(1);
    }

    let runtime = ScanRuntime::from_config(&config, None)?;
    let started = runtime.scheduler.start_scan(cli.scan_type).await;
    info!(
        job_id = %started.job_id,
        scan_type = %cli.scan_type,
        "Started {} scan",
        cli.scan_type.label()
    );

    let mut last_percent = None;
    let snapshot = loop {
        let snapshot = runtime.store.get_status(&started.job_id).await?;
        if snapshot.status.is_finished() {
            break snapshot;
        }
        if last_percent != Some(snapshot.percent) {
            info!(
                processed = snapshot.processed,
                total = snapshot.total,
                matches = snapshot.results_count,
                "Progress {}%",
                snapshot.percent
            );
            last_percent = Some(snapshot.percent);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    };

    if snapshot.status == JobStatus::Failed {
        let reason = snapshot.error.unwrap_or_else(|| "unknown error".to_string());
        error!(job_id = %snapshot.job_id, error = %reason, "Scan failed");
        return Err(reason.into());
    }

    for result in runtime.store.get_results(&snapshot.job_id).await? {
        println!("{}", serde_json::to_string(&result)?);
    }
    info!(
        total = snapshot.total,
        matches = snapshot.results_count,
        "{} scan complete",
        cli.scan_type.label()
    );

    Ok(())
}
