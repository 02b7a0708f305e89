//! trendscan API Server
//!
//! HTTP API for starting scans, polling job progress, reading the latest
//! results per scan type and analyzing single symbols. Job state lives in
//! process memory; run a single instance.

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use trendscan::config::Config;
use trendscan::core::http::start_server;
use trendscan::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env();
    info!("Starting trendscan API Server");
    info!(environment = %config.environment, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);
    info!(
        symbols_file = %config.symbols_file.display(),
        workers = config.scan.workers,
        requests_per_second = config.scan.requests_per_second,
        "Scan settings"
    );

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        result = start_server(&config) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
                return Err(e);
            }
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
