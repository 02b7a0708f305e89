//! Environment-driven configuration.
//!
//! Values are read from the process environment (after an optional `.env`
//! is loaded by the binary). Missing or unparsable values fall back to the
//! defaults below.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_SYMBOLS_FILE: &str = "top_indices_symbols.txt";

/// Deployment environment name (`APP_ENV`, defaults to `sandbox`).
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "sandbox".to_string())
        .to_lowercase()
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Retry budget for a single market data fetch.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(8000),
        }
    }
}

/// Scan engine settings.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Concurrent symbol evaluations per job.
    pub workers: usize,
    /// Provider-wide request rate shared by all jobs. `<= 0` disables pacing.
    pub requests_per_second: f64,
    pub retry: RetryPolicy,
    /// Finished jobs kept for status queries before the oldest is evicted.
    pub max_retained_jobs: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            workers: 4,
            requests_per_second: 2.0,
            retry: RetryPolicy::default(),
            max_retained_jobs: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub symbols_file: PathBuf,
    pub yahoo_base_url: String,
    pub scan: ScanSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            port: 8080,
            symbols_file: PathBuf::from(DEFAULT_SYMBOLS_FILE),
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            scan: ScanSettings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let retry_defaults = RetryPolicy::default();

        let retry = RetryPolicy {
            max_attempts: env_or("FETCH_MAX_ATTEMPTS", retry_defaults.max_attempts).max(1),
            base_delay: Duration::from_millis(env_or(
                "FETCH_BASE_DELAY_MS",
                retry_defaults.base_delay.as_millis() as u64,
            )),
            max_delay: Duration::from_millis(env_or(
                "FETCH_MAX_DELAY_MS",
                retry_defaults.max_delay.as_millis() as u64,
            )),
        };

        let scan = ScanSettings {
            workers: env_or("SCAN_WORKERS", defaults.scan.workers).max(1),
            requests_per_second: env_or(
                "REQUESTS_PER_SECOND",
                defaults.scan.requests_per_second,
            ),
            retry,
            max_retained_jobs: env_or("MAX_RETAINED_JOBS", defaults.scan.max_retained_jobs)
                .max(1),
        };

        Self {
            environment: get_environment(),
            port: env_or("PORT", defaults.port),
            symbols_file: env::var("SYMBOLS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.symbols_file),
            yahoo_base_url: env::var("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            scan,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}
