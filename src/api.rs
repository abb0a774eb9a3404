//! HTTP API server.
//!
//! Provides the recommendation lookup endpoint and a health check.

use agriwaste_core::config::{CorsConfig, ServerConfig};
use agriwaste_core::error::AgriError;
use agriwaste_core::record::{LocalizedView, LookupKey};
use agriwaste_core::RecommendationResolver;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    resolver: RecommendationResolver,
    uptime: Instant,
}

impl ApiState {
    pub fn new(resolver: RecommendationResolver) -> Self {
        Self {
            resolver,
            uptime: Instant::now(),
        }
    }
}

/// Query string of `GET /recommendation`.
///
/// Missing key parts are empty strings, which match no record.
#[derive(Debug, Deserialize)]
struct RecommendationQuery {
    #[serde(default)]
    product: String,
    #[serde(default)]
    moisture: String,
    #[serde(default, rename = "intendedUse")]
    intended_use: String,
    lang: Option<String>,
}

type ApiError = (StatusCode, Json<Value>);

/// Map a resolver error onto a server-side status.
fn error_response(e: &AgriError) -> ApiError {
    let status = if e.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({"error": e.to_string()})))
}

/// `GET /recommendation` — Localized recommendation for one product.
async fn recommendation(
    State(state): State<ApiState>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<LocalizedView>, ApiError> {
    let Query(query) = query.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("invalid query: {e}")})),
        )
    })?;

    let key = LookupKey::new(query.product, query.moisture, query.intended_use);

    match state.resolver.resolve(&key, query.lang.as_deref()).await {
        Ok(Some(view)) => Ok(Json(view)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Recommendation not found"})),
        )),
        Err(e) => {
            error!("recommendation lookup for {key} failed: {e}");
            Err(error_response(&e))
        }
    }
}

/// `GET /api/health` — Health check with uptime and store status.
async fn health(State(state): State<ApiState>) -> (StatusCode, Json<Value>) {
    let uptime_secs = state.uptime.elapsed().as_secs();

    match state.resolver.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "uptime_secs": uptime_secs,
                "store": "connected",
            })),
        ),
        Err(e) => {
            error!("health check: store ping failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "uptime_secs": uptime_secs,
                    "store": "unavailable",
                })),
            )
        }
    }
}

/// Build the CORS layer, or `None` when no origins are configured.
pub fn cors_layer(config: &CorsConfig) -> Result<Option<CorsLayer>, AgriError> {
    if config.allowed_origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if config.allowed_origins.iter().any(|o| o == "*") {
        if config.allow_credentials {
            return Err(AgriError::Config(
                "cors: wildcard origin cannot be combined with allow_credentials".to_string(),
            ));
        }
        AllowOrigin::any()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|e| AgriError::Config(format!("cors: invalid origin '{o}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.max_age_secs));

    Ok(Some(layer))
}

/// Build the axum router with shared state.
fn build_router(state: ApiState, cors: Option<CorsLayer>) -> Router {
    let router = Router::new()
        .route("/recommendation", get(recommendation))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

/// Wait for Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

/// Start the API server and run until Ctrl-C.
pub async fn serve(
    server: &ServerConfig,
    cors: &CorsConfig,
    resolver: RecommendationResolver,
) -> Result<(), AgriError> {
    let cors = cors_layer(cors)?;
    let app = build_router(ApiState::new(resolver), cors);
    let addr = server.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AgriError::Startup(format!("failed to bind to {addr}: {e}")))?;

    info!("API server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
