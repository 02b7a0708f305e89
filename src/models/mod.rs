//! Shared data models spanning the engine layers.

pub mod job;
pub mod market;
pub mod signal;

pub use job::{
    percent_of, JobSnapshot, JobStatus, JobSummary, LatestResults, ScanJob, ScanType,
};
pub use market::{Bar, PriceSeries, Timeframe};
pub use signal::{round2, EmaCrossoverSignal, SignalResult, Sma50Signal, BULLISH};
