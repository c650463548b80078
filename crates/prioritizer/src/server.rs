//! HTTP server for task prioritization.
//!
//! Provides REST API endpoints for:
//! - Health checks
//! - Analyzing a batch (full ranked list)
//! - Suggesting the top tasks of a batch
//!
//! Both batch endpoints accept the tasks and weights as a JSON body or as
//! JSON-encoded query parameters (`?tasks=[...]&weights={...}&limit=N`).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::ServerConfig;
use crate::domain::{local_today, RankingDomain};
use crate::entities::ScoredTask;
use crate::errors::PrioritizerError;
use crate::payload::{BatchQuery, TaskBatch};

/// Server state shared across handlers.
pub struct AppState {
    /// Ranking pipeline
    pub ranking: RankingDomain,
    /// Pin "today" instead of reading the clock
    pub fixed_today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(ranking: RankingDomain) -> Self {
        Self {
            ranking,
            fixed_today: None,
        }
    }

    pub fn with_fixed_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(local_today)
    }
}

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/tasks/analyze", get(analyze_handler).post(analyze_handler))
        .route("/api/tasks/analyze/", get(analyze_handler).post(analyze_handler))
        .route("/api/tasks/suggest", get(suggest_handler).post(suggest_handler))
        .route("/api/tasks/suggest/", get(suggest_handler).post(suggest_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.request_timeout_secs),
                )),
        )
        .with_state(state);

    if config.cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Start the HTTP server.
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the address.
pub async fn run_server(state: Arc<AppState>, config: &ServerConfig) -> Result<()> {
    let app = build_router(state, config);
    let addr = config.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Prioritizer server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Prioritizer server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Response to a suggest request.
#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub message: String,
    pub suggested_tasks: Vec<ScoredTask>,
}

/// Error body: `{"detail": ..., "field"?: ..., "task"?: ...}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<String>,
}

/// Handler error wrapper mapping [`PrioritizerError`] onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(PrioritizerError);

impl From<PrioritizerError> for ApiError {
    fn from(err: PrioritizerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let (field, task) = match &self.0 {
            PrioritizerError::MalformedField { task, field, .. } => {
                (Some(field.clone()), Some(task.clone()))
            }
            _ => (None, None),
        };

        let detail = match &self.0 {
            PrioritizerError::InvalidPayload { reason } => reason.clone(),
            other => other.to_string(),
        };

        warn!(status = %status, error = %self.0, "Request rejected");
        (status, Json(ErrorBody { detail, field, task })).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Unwrap the query string, reporting a rejection in the JSON error shape.
fn batch_query(query: Result<Query<BatchQuery>, QueryRejection>) -> Result<BatchQuery, ApiError> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| {
            ApiError(PrioritizerError::InvalidPayload {
                reason: rejection.body_text(),
            })
        })
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Full ranked list.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BatchQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<Vec<ScoredTask>>, ApiError> {
    let query = batch_query(query)?;
    let batch = TaskBatch::resolve(&query, &body)?.ok_or_else(|| {
        PrioritizerError::InvalidPayload {
            reason: "Payload must be a list of tasks or include a 'tasks' array.".to_string(),
        }
    })?;

    let ranked = state
        .ranking
        .analyze(&batch.tasks, &batch.weights, state.today())?;

    info!(tasks = ranked.len(), "Analyzed task batch");
    Ok(Json(ranked))
}

/// Top-N prefix of the ranked list.
async fn suggest_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BatchQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<SuggestResponse>, ApiError> {
    let query = batch_query(query)?;
    let batch = TaskBatch::resolve(&query, &body)?
        .filter(|batch| !batch.tasks.is_empty())
        .ok_or(PrioritizerError::EmptyBatch)?;

    let limit = batch
        .limit
        .unwrap_or(state.ranking.config().suggest_limit);
    let suggested = state
        .ranking
        .suggest(&batch.tasks, &batch.weights, state.today(), Some(limit))?;

    info!(tasks = batch.tasks.len(), returned = suggested.len(), "Suggested tasks");
    Ok(Json(SuggestResponse {
        message: format!("Top {limit} recommended tasks based on priority score"),
        suggested_tasks: suggested,
    }))
}
