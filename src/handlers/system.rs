// handlers/system.rs - GET / and GET /health

use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, IntoApiResponse};
use crate::state::AppState;

/// GET / - Service name, version and endpoint map
pub async fn root() -> ApiResponse<Value> {
    json!({
        "name": "Data Source API (Rust)",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "datasource": "POST /api/datasource/create",
        }
    })
    .into_api_response()
}

/// GET /health - Probes the storage gateway
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    match state.store.health_check().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }))),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Err(ApiError::service_unavailable(format!("database unavailable: {}", e)))
        }
    }
}
