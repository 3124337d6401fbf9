//! Health Check Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp
    pub timestamp: i64,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Overall status
    pub status: String,
    /// Database status
    pub database: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    /// Component name
    pub name: String,
    /// Status (healthy/unhealthy)
    pub status: String,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness: 200 while the process serves requests. Dependencies are not checked.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

/// Readiness: 200 when the database answers, 503 otherwise
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match state.db.health_check().await {
        Ok(health) if health.healthy => ComponentStatus {
            name: "SQLite".to_string(),
            status: "healthy".to_string(),
            error: None,
        },
        Ok(_) => ComponentStatus {
            name: "SQLite".to_string(),
            status: "unhealthy".to_string(),
            error: Some("SQLite health check failed".to_string()),
        },
        Err(e) => ComponentStatus {
            name: "SQLite".to_string(),
            status: "unhealthy".to_string(),
            error: Some(e.to_string()),
        },
    };

    let ready = database.error.is_none();
    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (
        status_code,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            database,
        }),
    )
}
