// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const OPENAI_CHAT: &str = "/api/openai/chat";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

// Upstream side
pub const UPSTREAM_CHAT: &str = "/openaiChatProxy";
pub const UPSTREAM_REGION: &str = "us-central1";
