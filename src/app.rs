use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::config::Config;
use crate::handlers::health_handler;
use crate::proxy::{self, ProxyMode};
use crate::routes;
use crate::state::AppState;

/// Handle to a running dev proxy.
pub struct DevProxyHandle {
    pub url: String,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<()>,
}

impl DevProxyHandle {
    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.server.await;
    }
}

/// Build the full router. The chat route is wired once, here.
pub fn router(state: AppState) -> Router {
    let router = Router::new().route(routes::HEALTH, get(health_handler));

    proxy::mount(router, &state.proxy)
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve the proxy mode from `config`, bind, and serve in the background.
pub async fn start(config: Config) -> Result<DevProxyHandle> {
    let proxy = ProxyMode::from_config(&config)?;

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;

    let state = AppState {
        config: Arc::new(config),
        proxy,
    };

    serve(listener, state).await
}

/// Serve `state` on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<DevProxyHandle> {
    let url = format!("http://{}", listener.local_addr()?);
    let app = router(state);
    let (tx, rx) = oneshot::channel();

    let server = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = rx.await;
            })
            .await;
        if let Err(e) = result {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(DevProxyHandle {
        url,
        shutdown: tx,
        server,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectId;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn state(project_id: Option<&str>) -> AppState {
        let config = Config {
            project_id: project_id
                .and_then(|id| ProjectId::resolve(|_| Some(id.to_string()))),
            service_port: 0,
            service_host: "127.0.0.1".to_string(),
        };
        let proxy = ProxyMode::from_config(&config).unwrap();
        AppState {
            config: Arc::new(config),
            proxy,
        }
    }

    async fn status_of(app: Router, method: &str, uri: &str) -> StatusCode {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_router_unconfigured() {
        let app = router(state(None));

        assert_eq!(status_of(app.clone(), "GET", "/health").await, StatusCode::OK);
        assert_eq!(
            status_of(app.clone(), "POST", "/api/openai/chat").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(app.clone(), "POST", "/api/openai/chat/extra").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(app, "GET", "/api-docs/openapi.json").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_forwarding_leaves_other_paths() {
        let app = router(state(Some("demo-app")));

        assert_eq!(status_of(app.clone(), "GET", "/health").await, StatusCode::OK);
        assert_eq!(
            status_of(app, "GET", "/api/openai/chat/extra").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let config = Config {
            project_id: None,
            service_port: 0,
            service_host: "127.0.0.1".to_string(),
        };
        let handle = start(config).await.unwrap();
        assert!(handle.url.starts_with("http://127.0.0.1:"));

        let response = reqwest::get(format!("{}/health", handle.url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        handle.shutdown().await;
    }
}
