use crate::config::Config;
use crate::proxy::ProxyMode;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub proxy: ProxyMode,
}
