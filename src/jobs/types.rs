//! Request/response types for starting scans.

use crate::models::ScanType;
use serde::{Deserialize, Serialize};

/// Outcome of reserving the per-scan-type slot in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStart {
    Created(String),
    AlreadyRunning(String),
}

/// Returned by `start_scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedScan {
    pub job_id: String,
    pub scan_type: ScanType,
    pub already_running: bool,
}
