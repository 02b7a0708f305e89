//! Scan job state and execution

pub mod context;
pub mod handlers;
pub mod store;
pub mod types;

pub use context::ScanContext;
pub use store::JobStore;
pub use types::{ScanStart, StartedScan};
