use std::env;
use std::fmt;
use anyhow::{Context, Result};

/// Preferred variable holding the Firebase/GCP project id.
pub const PROJECT_ID_VAR: &str = "REACT_APP_FIREBASE_PROJECT_ID";
/// Consulted only when `PROJECT_ID_VAR` is unset or empty.
pub const PROJECT_ID_FALLBACK_VAR: &str = "FIREBASE_PROJECT_ID";

/// Cloud project identifier used to build the upstream hostname. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectId(String);

impl ProjectId {
    /// Resolve the project id through `lookup`, preferring `PROJECT_ID_VAR`.
    ///
    /// Empty values are treated the same as unset ones. Values that are not
    /// valid project ids are logged and skipped, since the id ends up in the
    /// upstream hostname.
    pub fn resolve<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        [PROJECT_ID_VAR, PROJECT_ID_FALLBACK_VAR]
            .into_iter()
            .filter_map(|name| lookup(name).map(|value| (name, value)))
            .filter(|(_, value)| !value.is_empty())
            .find(|(name, value)| {
                let valid = Self::is_valid(value);
                if !valid {
                    tracing::warn!(
                        "Ignoring {}={:?}: only lowercase letters, digits and '-' are allowed",
                        name,
                        value
                    );
                }
                valid
            })
            .map(|(_, value)| ProjectId(value))
    }

    /// GCP project ids: lowercase ASCII letters, digits and hyphens.
    pub fn is_valid(value: &str) -> bool {
        !value.is_empty()
            && value
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: Option<ProjectId>,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = ProjectId::resolve(&lookup);

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            project_id,
            service_port,
            service_host,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.project_id {
            Some(id) => tracing::info!("  Firebase project: {}", id),
            None => tracing::warn!(
                "  Firebase project: not set ({} / {}), chat route will answer 500",
                PROJECT_ID_VAR,
                PROJECT_ID_FALLBACK_VAR
            ),
        }
        tracing::info!("  Service listening on: {}", self.listen_addr());
    }
}
