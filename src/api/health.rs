use crate::api::AppState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: verifies the relay credentials are configured.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match state.contact_service.relay_configured() {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok", relay: "ok" })),
        Err(missing) => {
            tracing::warn!(missing, component = "relay", "Readiness probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse { status: "error", relay: "unconfigured" }))
        }
    }
}
