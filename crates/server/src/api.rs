//! HTTP API: plugin endpoints, health checks and Prometheus metrics

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tco_lib::{
    health::{ComponentStatus, HealthRegistry},
    observability::{StructuredLogger, TcoMetrics},
    TcoError, TelcoDeployment, TelcoTcoPlugin,
};
use tracing::{debug, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub plugin: TelcoTcoPlugin,
    pub health_registry: HealthRegistry,
    pub metrics: TcoMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(plugin: TelcoTcoPlugin, health_registry: HealthRegistry) -> Self {
        Self {
            plugin,
            health_registry,
            metrics: TcoMetrics::new(),
            logger: StructuredLogger::new("http"),
        }
    }
}

/// Error body returned for every non-2xx API response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error type mapped onto HTTP status codes
#[derive(Debug)]
pub struct ApiError {
    error: TcoError,
    details: Option<String>,
}

impl From<TcoError> for ApiError {
    fn from(error: TcoError) -> Self {
        let details = match &error {
            TcoError::Validation(err) => Some(format!("field: {}", err.field())),
            _ => None,
        };
        ApiError { error, details }
    }
}

impl ApiError {
    /// Body decode failure, located by its position in the request
    fn decode(error: TcoError, err: &serde_json::Error) -> Self {
        ApiError {
            error,
            details: Some(format!("line {}, column {}", err.line(), err.column())),
        }
    }

    fn status(&self) -> StatusCode {
        match self.error.kind() {
            "validation" => StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.error.to_string(),
            code: self.error.kind().to_string(),
            details: self.details,
        };
        (status, Json(body)).into_response()
    }
}

/// Decode a JSON body; bad values are 422, malformed JSON is 400
fn parse_body<T: DeserializeOwned>(state: &AppState, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        if err.is_data() {
            state.metrics.inc_validation_failures();
            state
                .logger
                .log_validation_failure("body", &err.to_string());
            ApiError::decode(TcoError::InvalidInput(err.to_string()), &err)
        } else {
            ApiError::decode(TcoError::InvalidRequest(err.to_string()), &err)
        }
    })
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let deployment: TelcoDeployment = parse_body(&state, &body)?;
    let analysis = state.plugin.analyze(&deployment)?;
    Ok(Json(analysis))
}

async fn optimize(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let deployment: TelcoDeployment = parse_body(&state, &body)?;
    let recommendations = state.plugin.optimize(&deployment)?;
    Ok(Json(recommendations))
}

async fn compare(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let deployment: TelcoDeployment = parse_body(&state, &body)?;
    let comparison = state.plugin.compare_placement(&deployment)?;
    Ok(Json(comparison))
}

/// Raw plugin envelope; errors are reported inside the envelope with 200
async fn plugin(State(state): State<Arc<AppState>>, body: String) -> impl IntoResponse {
    let start = Instant::now();
    let response = state.plugin.handle_json(&body);
    debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Plugin request handled"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        response,
    )
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/analyze", post(analyze))
        .route("/api/v1/optimize", post(optimize))
        .route("/api/v1/compare", post(compare))
        .route("/api/v1/plugin", post(plugin))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve<F>(addr: &str, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
