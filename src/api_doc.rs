use utoipa::OpenApi;

use crate::error::{ErrorDetail, ErrorResponse, HealthResponse};
use crate::handlers;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "dev-proxy API",
        version = "1.0.0",
        description = "Development proxy forwarding the chat API to the openaiChatProxy Cloud Function"
    ),
    paths(
        handlers::health::health_handler,
        handlers::chat::forward_handler
    ),
    components(
        schemas(
            ErrorResponse,
            ErrorDetail,
            HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "proxy", description = "Forwarded API routes")
    )
)]
pub struct ApiDoc;
