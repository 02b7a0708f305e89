//! Unit tests for scan job lifecycle types

use trendscan::models::{percent_of, JobStatus, ScanJob, ScanType};
use trendscan::ScanError;

#[test]
fn test_scan_type_parse() {
    assert_eq!("ema_daily".parse::<ScanType>().unwrap(), ScanType::EmaDaily);
    assert_eq!(" EMA_WEEKLY ".parse::<ScanType>().unwrap(), ScanType::EmaWeekly);
    assert_eq!("sma50".parse::<ScanType>().unwrap(), ScanType::Sma50);
    assert!(matches!(
        "rsi".parse::<ScanType>(),
        Err(ScanError::UnknownScanType(t)) if t == "rsi"
    ));
}

#[test]
fn test_scan_type_labels() {
    assert_eq!(ScanType::EmaDaily.label(), "EMA Daily");
    assert_eq!(ScanType::EmaWeekly.label(), "EMA Weekly");
    assert_eq!(ScanType::Sma50.label(), "SMA50 Multi-TF");
    assert_eq!(ScanType::Sma50.timeframes().len(), 3);
}

#[test]
fn test_percent_of() {
    assert_eq!(percent_of(0, 0), 0);
    assert_eq!(percent_of(0, 3), 0);
    assert_eq!(percent_of(1, 3), 33);
    assert_eq!(percent_of(2, 3), 67);
    assert_eq!(percent_of(3, 3), 100);
}

#[test]
fn test_job_lifecycle() {
    let mut job = ScanJob::new(ScanType::EmaDaily);
    assert_eq!(job.status, JobStatus::Queued);
    assert!(job.status.is_active());
    assert_eq!(job.label, "EMA Daily");

    job.start(4);
    assert_eq!(job.status, JobStatus::Running);
    assert!(job.started_at.is_some());

    job.record(None);
    job.record(None);
    assert_eq!(job.processed, 2);
    assert_eq!(job.percent, 50);
    assert!(job.results.is_empty());

    job.complete();
    assert!(job.status.is_finished());
    assert!(job.completed_at.is_some());
}

#[test]
fn test_job_ids_are_unique() {
    let a = ScanJob::new(ScanType::Sma50);
    let b = ScanJob::new(ScanType::Sma50);
    assert_ne!(a.job_id, b.job_id);
}

#[test]
fn test_failed_job_keeps_message() {
    let mut job = ScanJob::new(ScanType::Sma50);
    job.fail("symbol universe is empty");
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.snapshot().error.as_deref(), Some("symbol universe is empty"));
}
