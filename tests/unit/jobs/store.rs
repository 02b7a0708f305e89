//! Unit tests for the job store and latest-results cache

use trendscan::jobs::{JobStore, ScanStart};
use trendscan::models::{
    EmaCrossoverSignal, JobStatus, ScanType, SignalResult, Timeframe, BULLISH,
};
use trendscan::ScanError;

fn signal(symbol: &str, matched: bool) -> SignalResult {
    SignalResult::EmaCrossover(EmaCrossoverSignal {
        symbol: symbol.to_string(),
        signal: BULLISH.to_string(),
        timeframe: Timeframe::Daily,
        price: 10.0,
        ema10: 9.0,
        ema20: 8.0,
        ema40: 7.0,
        condition: "test".to_string(),
        matched,
    })
}

async fn begin(store: &JobStore, scan_type: ScanType) -> String {
    match store.begin(scan_type).await {
        ScanStart::Created(id) => id,
        ScanStart::AlreadyRunning(id) => panic!("unexpected in-flight job {}", id),
    }
}

#[tokio::test]
async fn test_begin_is_exclusive_per_scan_type() {
    let store = JobStore::default();
    let first = begin(&store, ScanType::EmaDaily).await;

    match store.begin(ScanType::EmaDaily).await {
        ScanStart::AlreadyRunning(id) => assert_eq!(id, first),
        ScanStart::Created(id) => panic!("second job {} created", id),
    }
    // Other scan types are independent.
    begin(&store, ScanType::Sma50).await;
    assert_eq!(store.in_flight(ScanType::EmaDaily).await, Some(first));
}

#[tokio::test]
async fn test_progress_and_results() {
    let store = JobStore::default();
    let id = begin(&store, ScanType::EmaDaily).await;
    assert_eq!(store.get_status(&id).await.unwrap().status, JobStatus::Queued);

    store.mark_running(&id, 4).await;
    store.record(&id, Some(signal("AAPL", true))).await;
    store.record(&id, None).await;
    store.record(&id, Some(signal("MSFT", false))).await;

    let snapshot = store.get_status(&id).await.unwrap();
    assert_eq!(snapshot.status, JobStatus::Running);
    assert_eq!(snapshot.processed, 3);
    assert_eq!(snapshot.total, 4);
    assert_eq!(snapshot.percent, 75);
    assert_eq!(snapshot.results_count, 1);
    assert_eq!(snapshot.results[0].symbol(), "AAPL");
}

#[tokio::test]
async fn test_results_not_ready_until_completed() {
    let store = JobStore::default();
    let id = begin(&store, ScanType::EmaWeekly).await;
    store.mark_running(&id, 1).await;

    assert!(matches!(
        store.get_results(&id).await,
        Err(ScanError::JobNotReady { status: JobStatus::Running, .. })
    ));

    store.record(&id, Some(signal("AAPL", true))).await;
    let latest = store.complete(&id).await.expect("published");

    assert_eq!(store.get_results(&id).await.unwrap().len(), 1);
    assert_eq!(latest.job_id, id);
    assert_eq!(latest.total_scanned, 1);
    assert_eq!(latest.label, "EMA Weekly");
    assert_eq!(store.in_flight(ScanType::EmaWeekly).await, None);
}

#[tokio::test]
async fn test_unknown_job() {
    let store = JobStore::default();
    assert!(matches!(
        store.get_status("missing").await,
        Err(ScanError::JobNotFound(_))
    ));
    assert!(matches!(
        store.get_results("missing").await,
        Err(ScanError::JobNotFound(_))
    ));
}

#[tokio::test]
async fn test_failed_job_leaves_latest_untouched() {
    let store = JobStore::default();

    let ok = begin(&store, ScanType::Sma50).await;
    store.mark_running(&ok, 1).await;
    store.record(&ok, Some(signal("AAPL", true))).await;
    store.complete(&ok).await;

    let failed = begin(&store, ScanType::Sma50).await;
    store.fail(&failed, "symbol universe is empty").await;

    let snapshot = store.get_status(&failed).await.unwrap();
    assert_eq!(snapshot.status, JobStatus::Failed);
    assert_eq!(snapshot.error.as_deref(), Some("symbol universe is empty"));
    assert!(matches!(
        store.get_results(&failed).await,
        Err(ScanError::JobNotReady { status: JobStatus::Failed, .. })
    ));

    let latest = store.get_latest(ScanType::Sma50).await.unwrap();
    assert_eq!(latest.job_id, ok);
    assert_eq!(store.in_flight(ScanType::Sma50).await, None);
}

#[tokio::test]
async fn test_latest_reads_are_stable() {
    let store = JobStore::default();
    assert!(store.get_latest(ScanType::EmaDaily).await.is_none());

    let id = begin(&store, ScanType::EmaDaily).await;
    store.mark_running(&id, 0).await;
    store.complete(&id).await;

    let a = store.get_latest(ScanType::EmaDaily).await.unwrap();
    let b = store.get_latest(ScanType::EmaDaily).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.results_count, 0);
}

#[tokio::test]
async fn test_finished_jobs_are_terminal() {
    let store = JobStore::default();
    let id = begin(&store, ScanType::EmaDaily).await;
    store.mark_running(&id, 1).await;
    store.complete(&id).await;

    store.fail(&id, "late failure").await;
    store.record(&id, Some(signal("AAPL", true))).await;

    let snapshot = store.get_status(&id).await.unwrap();
    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.results_count, 0);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_oldest_finished_jobs_evicted() {
    let store = JobStore::new(2);
    let mut ids = Vec::new();
    for _ in 0..3 {
        let id = begin(&store, ScanType::EmaDaily).await;
        store.mark_running(&id, 0).await;
        store.complete(&id).await;
        ids.push(id);
    }

    assert!(store.get_status(&ids[0]).await.is_err());
    assert!(store.get_status(&ids[1]).await.is_ok());
    assert!(store.get_status(&ids[2]).await.is_ok());
    assert_eq!(store.list_jobs().await.len(), 2);
    // The latest cache outlives eviction.
    assert_eq!(store.get_latest(ScanType::EmaDaily).await.unwrap().job_id, ids[2]);
}

#[tokio::test]
async fn test_zero_retention_keeps_last_finished_job() {
    let store = JobStore::new(0);
    let id = begin(&store, ScanType::EmaDaily).await;
    store.mark_running(&id, 1).await;
    store.record(&id, Some(signal("AAPL", true))).await;
    store.complete(&id).await;

    let snapshot = store.get_status(&id).await.unwrap();
    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(store.get_results(&id).await.unwrap().len(), 1);

    let failed = begin(&store, ScanType::Sma50).await;
    store.fail(&failed, "universe unavailable").await;
    assert!(store.get_status(&id).await.is_err());
    assert_eq!(
        store.get_status(&failed).await.unwrap().status,
        JobStatus::Failed
    );
}

#[tokio::test]
async fn test_list_jobs_newest_first() {
    let store = JobStore::default();
    let first = begin(&store, ScanType::EmaDaily).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = begin(&store, ScanType::Sma50).await;

    let jobs = store.list_jobs().await;
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].job_id, second);
    assert_eq!(jobs[1].job_id, first);
}
