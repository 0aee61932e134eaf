//! Provider configuration and per-call context
//!
//! [`Provider::configure`] builds the primary admin handle at the configured
//! API version plus a shadow handle at v3, registers the pair, and hands out a
//! [`ProviderMeta`] that every CRUD call receives.

use crate::admin::{ApiVersion, PulsarAdmin};
use crate::registry::ClientRegistry;
use crate::validate::validate_url;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_WEB_SERVICE_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_VERSION: &str = "2";

fn default_web_service_url() -> String {
    DEFAULT_WEB_SERVICE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

/// Provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Admin REST endpoint of the cluster
    #[serde(default = "default_web_service_url")]
    pub web_service_url: String,
    /// Bearer token sent with every admin call
    #[serde(default)]
    pub token: Option<String>,
    /// API version of the primary handle ("2" or "3")
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub tls_allow_insecure_connection: bool,
    /// Per-request timeout; unset means no timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            web_service_url: default_web_service_url(),
            token: None,
            api_version: default_api_version(),
            tls_allow_insecure_connection: false,
            request_timeout_secs: None,
        }
    }
}

impl ProviderConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pulsar-provider").join("config.json"))
    }

    /// Load configuration from disk, then apply environment overrides
    pub fn load() -> Self {
        let from_disk = match Self::config_path() {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                    Self::default()
                }),
                Err(_) => Self::default(),
            },
            _ => Self::default(),
        };

        from_disk.with_env_overrides()
    }

    /// Apply `WEB_SERVICE_URL`, `PULSAR_AUTH_TOKEN` and `PULSAR_API_VERSION`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("WEB_SERVICE_URL") {
            self.web_service_url = url;
        }
        if let Ok(token) = std::env::var("PULSAR_AUTH_TOKEN") {
            self.token = Some(token);
        }
        if let Ok(version) = std::env::var("PULSAR_API_VERSION") {
            self.api_version = version;
        }
        self
    }
}

/// Per-call context: the primary handle and the way to its v3 shadow
#[derive(Debug, Clone)]
pub struct ProviderMeta {
    primary: PulsarAdmin,
    registry: Arc<ClientRegistry>,
}

impl ProviderMeta {
    pub fn new(primary: PulsarAdmin, registry: Arc<ClientRegistry>) -> Self {
        Self { primary, registry }
    }

    /// Handle for resources served at the configured version
    pub fn client(&self) -> &PulsarAdmin {
        &self.primary
    }

    /// Handle for v3-only resources.
    ///
    /// # Panics
    ///
    /// When the primary handle has no registered shadow.
    pub fn v3_client(&self) -> PulsarAdmin {
        self.registry.resolve(&self.primary)
    }
}

/// Provider instance; owns the dual-client registry
#[derive(Debug, Default)]
pub struct Provider {
    registry: Arc<ClientRegistry>,
}

impl Provider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Build and register the client pair for `config`
    pub fn configure(&self, config: &ProviderConfig) -> Result<ProviderMeta> {
        let validation = validate_url(&config.web_service_url, "web_service_url");
        if !validation.is_ok() {
            anyhow::bail!(validation.errors.join("; "));
        }

        let version = ApiVersion::parse(&config.api_version).with_context(|| {
            format!(
                "\"api_version\" must be 2 or 3, got: {}",
                config.api_version
            )
        })?;

        let primary = PulsarAdmin::new(config, version)
            .context("Failed to create Pulsar admin client")?;
        let shadow = PulsarAdmin::new(config, ApiVersion::V3)
            .context("Failed to create Pulsar admin v3 client")?;

        tracing::info!(
            "Configured admin clients for {} (primary {}, shadow {})",
            primary.web_service_url,
            version,
            ApiVersion::V3
        );

        self.registry.register(&primary, shadow);
        Ok(ProviderMeta::new(primary, Arc::clone(&self.registry)))
    }
}
