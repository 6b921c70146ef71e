use crate::error::{ApiError, ErrorResponse};
use crate::proxy::ProxyMode;
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::Method,
    response::Response,
};

/// ANY /api/openai/chat handler - Forward to the openaiChatProxy Cloud Function
///
/// The route accepts every HTTP method; POST is the one chat clients use and
/// is what is documented here. Method, headers, query string and body are
/// passed to the upstream and its response is streamed back unchanged.
#[utoipa::path(
    post,
    path = routes::OPENAI_CHAT,
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Upstream response, passed through"),
        (status = 400, description = "Request body aborted", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "No project id configured", body = ErrorResponse),
        (status = 502, description = "Upstream unreachable", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    ),
    tag = "proxy"
)]
pub async fn forward_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    match &state.proxy {
        ProxyMode::Forwarding(forwarder) => forwarder.forward(request).await,
        ProxyMode::Unconfigured => Err(ApiError::MissingProjectId),
    }
}

/// Registered in place of `forward_handler` when no project id is set.
pub async fn missing_project_handler(method: Method) -> ApiError {
    tracing::warn!(
        "Rejecting {} {}: no project id configured",
        method,
        routes::OPENAI_CHAT
    );
    ApiError::MissingProjectId
}
