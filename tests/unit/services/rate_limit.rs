//! Unit tests for the shared request pacer

use std::sync::Arc;
use std::time::{Duration, Instant};
use trendscan::services::RatePacer;

#[test]
fn test_interval_from_rate() {
    assert_eq!(RatePacer::new(4.0).interval(), Some(Duration::from_millis(250)));
    assert_eq!(RatePacer::new(0.0).interval(), None);
    assert_eq!(RatePacer::new(-1.0).interval(), None);
    assert_eq!(RatePacer::unlimited().interval(), None);
}

#[tokio::test]
async fn test_unlimited_pacer_does_not_wait() {
    let pacer = RatePacer::unlimited();
    let start = Instant::now();
    for _ in 0..100 {
        pacer.acquire().await;
    }
    assert!(start.elapsed() < Duration::from_millis(50));
}

#[tokio::test]
async fn test_pacer_spaces_requests() {
    let pacer = RatePacer::new(50.0);
    let start = Instant::now();
    for _ in 0..5 {
        pacer.acquire().await;
    }
    // First slot is immediate, the next four are 20ms apart.
    assert!(start.elapsed() >= Duration::from_millis(75));
}

#[tokio::test]
async fn test_pacer_shared_across_tasks() {
    let pacer = Arc::new(RatePacer::new(50.0));
    let start = Instant::now();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let pacer = pacer.clone();
            tokio::spawn(async move { pacer.acquire().await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert!(start.elapsed() >= Duration::from_millis(95));
}
