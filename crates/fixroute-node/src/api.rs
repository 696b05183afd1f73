//! HTTP API server for the fixroute node.
//!
//! Provides REST endpoints for building fixed routes, reindexing the gossip
//! cache, and node status.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use fixroute_core::{NodeId, Route};
use fixroute_routing::RoutingError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::state::NodeState;

pub const PURGE_RESULT: &str = "successfully reindexed the gossip store.";

// --- Request / response types ---

#[derive(Deserialize)]
pub struct FixedRouteRequest {
    /// Amount delivered to the last waypoint, in millisatoshi.
    pub amount: u64,
    /// Waypoint node ids in hex, source first.
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct FixedRouteResponse {
    pub route: Route,
}

#[derive(Serialize)]
pub struct PurgeResponse {
    pub result: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub uptime_secs: u64,
    pub upstream: String,
    pub channels: usize,
    pub nodes: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_for(err: &RoutingError) -> StatusCode {
    match err {
        RoutingError::InvalidWaypoints(_) | RoutingError::InvalidAmount => StatusCode::BAD_REQUEST,
        RoutingError::MissingChannel { .. }
        | RoutingError::MissingNode(_)
        | RoutingError::NoPath { .. } => StatusCode::NOT_FOUND,
        RoutingError::Oracle { .. } | RoutingError::Refresh(_) => StatusCode::BAD_GATEWAY,
        RoutingError::MalformedFeatureData { .. } | RoutingError::Overflow(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn routing_error(err: RoutingError) -> ApiError {
    (
        status_for(&err),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_status(State(state): State<Arc<NodeState>>) -> Json<StatusResponse> {
    let stats = state.cache.stats();
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        upstream: state.upstream.clone(),
        channels: stats.channels,
        nodes: stats.nodes,
        refreshed_at: stats.refreshed_at,
    })
}

async fn handle_get_fixed_route(
    State(state): State<Arc<NodeState>>,
    body: Result<Json<FixedRouteRequest>, JsonRejection>,
) -> Result<Json<FixedRouteResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        (
            rejection.status(),
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;
    let waypoints = req
        .nodes
        .iter()
        .map(|n| n.parse::<NodeId>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })?;

    match state.builder.build(req.amount, &waypoints).await {
        Ok(route) => Ok(Json(FixedRouteResponse { route })),
        Err(e) => {
            tracing::warn!(error = %e, amount_msat = req.amount, "fixed route request failed");
            Err(routing_error(e))
        }
    }
}

async fn handle_purge(
    State(state): State<Arc<NodeState>>,
) -> Result<Json<PurgeResponse>, ApiError> {
    state.cache.refresh().await.map_err(|e| {
        tracing::error!(error = %e, "gossip reindex failed");
        routing_error(e)
    })?;
    Ok(Json(PurgeResponse {
        result: PURGE_RESULT.into(),
    }))
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/v1/status", get(handle_status))
        .route("/v1/getfixedroute", post(handle_get_fixed_route))
        .route("/v1/getfixedroute_purge", post(handle_purge))
        .with_state(state)
}

pub async fn start_api_server(listener: TcpListener, state: Arc<NodeState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listen_addr = listener.local_addr()?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
