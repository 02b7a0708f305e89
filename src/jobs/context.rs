//! Shared dependencies for scan runs

use crate::jobs::store::JobStore;
use crate::metrics::Metrics;
use crate::services::universe::SymbolUniverse;
use crate::signals::engine::SignalEngine;
use std::sync::Arc;

/// Context handed to every scan run.
///
/// Contains:
/// - Signal engine (fetch + indicators + rules, sharing the global pacer)
/// - Symbol universe
/// - Job store (the only place job state lives)
/// - Metrics (optional)
pub struct ScanContext {
    pub engine: Arc<SignalEngine>,
    pub universe: Arc<dyn SymbolUniverse>,
    pub store: Arc<JobStore>,
    pub metrics: Option<Arc<Metrics>>,
    /// Concurrent symbol evaluations per job.
    pub workers: usize,
}

impl ScanContext {
    pub fn new(
        engine: Arc<SignalEngine>,
        universe: Arc<dyn SymbolUniverse>,
        store: Arc<JobStore>,
        metrics: Option<Arc<Metrics>>,
        workers: usize,
    ) -> Self {
        Self {
            engine,
            universe,
            store,
            metrics,
            workers: workers.max(1),
        }
    }
}
