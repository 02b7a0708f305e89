//! Error taxonomy for the scan engine.
//!
//! Per-symbol errors ([`IndicatorError`], [`DataError`], wrapped by [`SymbolError`])
//! never escape a scan job. [`ScanError`] is what callers of the engine see.

use crate::models::{JobStatus, Timeframe};
use thiserror::Error;

/// Indicator computation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid indicator period: {0}")]
    InvalidPeriod(usize),
}

/// Raw failures reported by a market data provider for a single request.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("empty response for {0}")]
    Empty(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Transport failures, throttling, server errors and empty payloads are
    /// transient on the public chart API.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Network(_) => true,
            ProviderError::RateLimited { .. } => true,
            ProviderError::Empty(_) => true,
            ProviderError::Status { status, .. } => *status >= 500 || *status == 429,
            ProviderError::SymbolNotFound(_) | ProviderError::Malformed(_) => false,
        }
    }
}

/// Fetch failure after the retry budget is spent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    /// The provider has no bars for this symbol and timeframe.
    #[error("no data for {symbol} ({timeframe}): {reason}")]
    NotFound {
        symbol: String,
        timeframe: Timeframe,
        reason: String,
    },

    /// Upstream failure: outage, throttling or a malformed payload.
    #[error("data unavailable for {symbol} ({timeframe}): {reason}")]
    Unavailable {
        symbol: String,
        timeframe: Timeframe,
        reason: String,
    },
}

impl DataError {
    /// Final outcome of a fetch that ended with `err`.
    pub fn from_provider(symbol: &str, timeframe: Timeframe, err: &ProviderError) -> Self {
        let symbol = symbol.to_string();
        let reason = err.to_string();
        match err {
            ProviderError::SymbolNotFound(_) | ProviderError::Empty(_) => DataError::NotFound {
                symbol,
                timeframe,
                reason,
            },
            _ => DataError::Unavailable {
                symbol,
                timeframe,
                reason,
            },
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            DataError::NotFound { symbol, .. } | DataError::Unavailable { symbol, .. } => symbol,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound { .. })
    }
}

/// Per-symbol failure inside a scan. Recovered as "no match".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

impl SymbolError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SymbolError::Data(_) => "data_unavailable",
            SymbolError::Indicator(_) => "insufficient_data",
        }
    }
}

/// Symbol universe resolution failure.
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("symbol list {path} could not be read: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("symbol universe is empty")]
    Empty,
}

/// Errors surfaced to engine callers.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("job {job_id} is {status}, results not ready")]
    JobNotReady { job_id: String, status: JobStatus },

    #[error("no usable market data for symbol {0}")]
    SymbolNotFound(String),

    #[error("unknown scan type '{0}', expected one of: ema_daily, ema_weekly, sma50")]
    UnknownScanType(String),

    #[error("market data unavailable: {0}")]
    MarketDataUnavailable(String),

    #[error("symbol universe unavailable: {0}")]
    UniverseUnavailable(#[from] UniverseError),

    #[error("internal error: {0}")]
    Internal(String),
}
