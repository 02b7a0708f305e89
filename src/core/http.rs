//! HTTP endpoint server using Axum

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::config::Config;
use crate::core::runtime::ScanRuntime;
use crate::error::ScanError;
use crate::metrics::Metrics;
use crate::models::{JobStatus, ScanType};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub runtime: Arc<ScanRuntime>,
}

impl AppState {
    pub fn new(runtime: Arc<ScanRuntime>, metrics: Arc<Metrics>) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            runtime,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Error response with a `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        let status = match &err {
            ScanError::JobNotFound(_) | ScanError::SymbolNotFound(_) => StatusCode::NOT_FOUND,
            ScanError::JobNotReady { status, .. } if *status == JobStatus::Failed => {
                StatusCode::CONFLICT
            }
            ScanError::JobNotReady { .. } => StatusCode::ACCEPTED,
            ScanError::UnknownScanType(_) => StatusCode::BAD_REQUEST,
            ScanError::UniverseUnavailable(_) | ScanError::MarketDataUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ScanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "request failed");
        }
        ApiError::new(status, err.to_string())
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "trendscan API is running",
        "timestamp": chrono::Utc::now(),
    }))
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "trendscan"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

async fn list_symbols(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let symbols = state
        .runtime
        .universe
        .list_symbols(ScanType::EmaDaily)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to load symbol universe");
            ApiError::from(ScanError::from(e))
        })?;

    Ok(Json(json!({
        "count": symbols.len(),
        "symbols": symbols,
    })))
}

async fn analyze_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Value>> {
    let report = state.runtime.analyzer.analyze(&symbol).await?;
    Ok(Json(json!(report)))
}

#[derive(Debug, Deserialize)]
struct StartScanRequest {
    #[serde(rename = "type")]
    scan_type: String,
}

async fn start_scan(
    State(state): State<AppState>,
    payload: Result<Json<StartScanRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
    let scan_type: ScanType = request
        .scan_type
        .parse()
        .map_err(|e: ScanError| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let started = state.runtime.scheduler.start_scan(scan_type).await;
    let message = if started.already_running {
        format!("{} scan already running", scan_type.label())
    } else {
        format!("{} scan started", scan_type.label())
    };
    let status = state
        .runtime
        .store
        .get_status(&started.job_id)
        .await
        .map(|snapshot| snapshot.status)
        .unwrap_or(JobStatus::Queued);

    Ok(Json(json!({
        "job_id": started.job_id,
        "scan_type": started.scan_type,
        "status": status,
        "already_running": started.already_running,
        "message": message,
    })))
}

async fn scan_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let snapshot = state.runtime.store.get_status(&job_id).await?;
    Ok(Json(json!(snapshot)))
}

async fn scan_results(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let store = &state.runtime.store;
    match store.get_results(&job_id).await {
        Ok(results) => {
            let snapshot = store.get_status(&job_id).await?;
            Ok(Json(json!({
                "job_id": snapshot.job_id,
                "scan_type": snapshot.scan_type,
                "label": snapshot.label,
                "status": snapshot.status,
                "total_scanned": snapshot.processed,
                "results_count": results.len(),
                "results": results,
                "completed_at": snapshot.completed_at,
            }))
            .into_response())
        }
        Err(ScanError::JobNotReady { status, .. }) if status.is_active() => {
            let snapshot = store.get_status(&job_id).await?;
            Ok((StatusCode::ACCEPTED, Json(json!(snapshot))).into_response())
        }
        Err(ScanError::JobNotReady { .. }) => {
            let snapshot = store.get_status(&job_id).await?;
            let detail = snapshot
                .error
                .unwrap_or_else(|| format!("job {} failed", job_id));
            Err(ApiError::new(StatusCode::CONFLICT, detail))
        }
        Err(e) => Err(e.into()),
    }
}

async fn latest_results(
    State(state): State<AppState>,
    Path(scan_type): Path<String>,
) -> ApiResult<Json<Value>> {
    let scan_type: ScanType = scan_type.parse()?;

    match state.runtime.store.get_latest(scan_type).await {
        Some(latest) => Ok(Json(json!(latest.as_ref()))),
        None => Ok(Json(json!({
            "scan_type": scan_type,
            "label": scan_type.label(),
            "job_id": null,
            "completed_at": null,
            "total_scanned": 0,
            "results_count": 0,
            "results": [],
        }))),
    }
}

async fn list_jobs(State(state): State<AppState>) -> Json<Value> {
    let jobs = state.runtime.store.list_jobs().await;
    Json(json!({ "jobs": jobs }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/symbols", get(list_symbols))
        .route("/api/analyze/{symbol}", get(analyze_symbol))
        .route("/api/scan/start", post(start_scan))
        .route("/api/scan/status/{job_id}", get(scan_status))
        .route("/api/scan/results/{job_id}", get(scan_results))
        .route("/api/scan/latest/{scan_type}", get(latest_results))
        .route("/api/jobs", get(list_jobs))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let runtime = Arc::new(ScanRuntime::from_config(config, Some(metrics.clone()))?);

    let state = AppState::new(runtime, metrics);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(
        port = config.port,
        "HTTP server listening on port {}", config.port
    );
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
