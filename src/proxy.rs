use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap},
    response::Response,
    routing::any,
    Router,
};
use reqwest::Client;

use crate::config::{Config, ProjectId};
use crate::error::ApiError;
use crate::handlers::chat::{forward_handler, missing_project_handler};
use crate::routes;
use crate::state::AppState;

/// Upper bound on a buffered inbound request body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// What the chat route does for the lifetime of the process.
#[derive(Clone, Debug)]
pub enum ProxyMode {
    /// No project id: answer every request with a 500 diagnostic
    Unconfigured,
    /// Forward every request to the project's Cloud Function
    Forwarding(Forwarder),
}

impl ProxyMode {
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.project_id {
            Some(project_id) => {
                let forwarder = Forwarder::new(Upstream::for_project(project_id))?;
                Ok(ProxyMode::Forwarding(forwarder))
            }
            None => Ok(ProxyMode::Unconfigured),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProxyMode::Unconfigured => "unconfigured",
            ProxyMode::Forwarding(_) => "forwarding",
        }
    }
}

/// Register the chat route on `router`.
///
/// Exactly one route is added, and only the exact path matches:
/// `/api/openai/chat/extra` or a trailing slash fall through to the 404.
/// Every HTTP method is accepted.
pub fn mount(router: Router<AppState>, mode: &ProxyMode) -> Router<AppState> {
    match mode {
        ProxyMode::Unconfigured => {
            tracing::warn!(
                "No project id configured, {} will respond with 500",
                routes::OPENAI_CHAT
            );
            router.route(routes::OPENAI_CHAT, any(missing_project_handler))
        }
        ProxyMode::Forwarding(forwarder) => {
            tracing::info!(
                "Proxying {} -> {}{}",
                routes::OPENAI_CHAT,
                forwarder.upstream().origin(),
                routes::UPSTREAM_CHAT
            );
            router.route(routes::OPENAI_CHAT, any(forward_handler))
        }
    }
}

/// Rewrite an inbound `path?query` for the upstream.
///
/// Only the exact chat path is rewritten; the query string is kept as is.
pub fn rewrite_path(path_and_query: &str) -> String {
    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    };

    let path = if path == routes::OPENAI_CHAT {
        routes::UPSTREAM_CHAT
    } else {
        path
    };

    match query {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

/// Remote origin requests are forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    origin: String,
}

impl Upstream {
    /// `https://us-central1-<project>.cloudfunctions.net`
    pub fn for_project(project_id: &ProjectId) -> Self {
        Self {
            origin: format!(
                "https://{}-{}.cloudfunctions.net",
                routes::UPSTREAM_REGION,
                project_id
            ),
        }
    }

    /// Arbitrary origin, e.g. a local stand-in for the Cloud Function.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.origin, rewrite_path(path_and_query))
    }
}

/// Sends inbound requests to the upstream and streams the answer back.
///
/// The HTTP client keeps its default certificate verification, and the
/// `Host` header is always derived from the upstream URL.
#[derive(Clone, Debug)]
pub struct Forwarder {
    client: Client,
    upstream: Upstream,
}

impl Forwarder {
    pub fn new(upstream: Upstream) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self { client, upstream })
    }

    pub fn upstream(&self) -> &Upstream {
        &self.upstream
    }

    pub async fn forward(&self, request: Request) -> Result<Response, ApiError> {
        let (parts, body) = request.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());
        let url = self.upstream.url_for(path_and_query);
        let method = parts.method;

        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(ApiError::RequestBody)?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);

        tracing::debug!("Forwarding {} {}", method, url);

        let upstream_response = self
            .client
            .request(method.clone(), &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Upstream request {} {} failed: {}", method, url, err);
                ApiError::Upstream(err)
            })?;

        let status = upstream_response.status();
        let mut response_headers = upstream_response.headers().clone();
        strip_hop_by_hop(&mut response_headers);

        tracing::info!("{} {} -> {}", method, url, status);

        let mut response = Response::new(Body::from_stream(upstream_response.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

/// Drop the fixed hop-by-hop set plus every header named in `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    for name in &listed {
        headers.remove(name.as_str());
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}
