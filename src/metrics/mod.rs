//! Prometheus metrics for the HTTP surface and the scan engine.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub scans_started_total: IntCounterVec,
    pub scans_finished_total: IntCounterVec,
    pub scans_running: IntGaugeVec,
    pub scan_symbols_processed_total: IntCounterVec,
    pub scan_symbol_failures_total: IntCounterVec,
    pub scan_matches_total: IntCounterVec,
    pub market_data_requests_total: IntCounterVec,
    pub market_data_retries_total: IntCounter,
    pub market_data_failures_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;

        let scans_started_total = IntCounterVec::new(
            Opts::new("scans_started_total", "Scan jobs started"),
            &["scan_type"],
        )?;
        let scans_finished_total = IntCounterVec::new(
            Opts::new("scans_finished_total", "Scan jobs finished by final status"),
            &["scan_type", "status"],
        )?;
        let scans_running = IntGaugeVec::new(
            Opts::new("scans_running", "Scan jobs currently running"),
            &["scan_type"],
        )?;
        let scan_symbols_processed_total = IntCounterVec::new(
            Opts::new("scan_symbols_processed_total", "Symbols evaluated by scans"),
            &["scan_type"],
        )?;
        let scan_symbol_failures_total = IntCounterVec::new(
            Opts::new(
                "scan_symbol_failures_total",
                "Symbols skipped during scans, by failure kind",
            ),
            &["scan_type", "kind"],
        )?;
        let scan_matches_total = IntCounterVec::new(
            Opts::new("scan_matches_total", "Symbols matching a scan rule"),
            &["scan_type"],
        )?;
        let market_data_requests_total = IntCounterVec::new(
            Opts::new("market_data_requests_total", "Market data provider requests"),
            &["timeframe"],
        )?;
        let market_data_retries_total =
            IntCounter::new("market_data_retries_total", "Market data request retries")?;
        let market_data_failures_total = IntCounterVec::new(
            Opts::new(
                "market_data_failures_total",
                "Market data fetches that failed after retries",
            ),
            &["timeframe"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(scans_started_total.clone()))?;
        registry.register(Box::new(scans_finished_total.clone()))?;
        registry.register(Box::new(scans_running.clone()))?;
        registry.register(Box::new(scan_symbols_processed_total.clone()))?;
        registry.register(Box::new(scan_symbol_failures_total.clone()))?;
        registry.register(Box::new(scan_matches_total.clone()))?;
        registry.register(Box::new(market_data_requests_total.clone()))?;
        registry.register(Box::new(market_data_retries_total.clone()))?;
        registry.register(Box::new(market_data_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            scans_started_total,
            scans_finished_total,
            scans_running,
            scan_symbols_processed_total,
            scan_symbol_failures_total,
            scan_matches_total,
            market_data_requests_total,
            market_data_retries_total,
            market_data_failures_total,
        })
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
