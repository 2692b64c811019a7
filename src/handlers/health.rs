use crate::schemas::{AppState, HealthResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{instrument, warn};

/// Health check endpoint
///
/// Reports `503` with `status = "degraded"` while the database cannot be reached.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status, database) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "connected"),
        Err(e) => {
            warn!("Database ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
        }
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    };

    (status_code, Json(response))
}
