use crate::error::HealthResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /health handler - Health check endpoint
///
/// Always 200; `mode` tells whether the chat route forwards or answers 500.
/// The upstream is not probed.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    tracing::debug!("Health check, proxy mode: {}", state.proxy.name());
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            mode: state.proxy.name().to_string(),
        }),
    )
}
