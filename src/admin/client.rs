//! Pulsar admin client handle
//!
//! A [`PulsarAdmin`] is bound to one API version. Sinks are only served on
//! `/admin/v3`, while the provider is configured against `/admin/v2`, so the
//! provider holds two handles (see [`crate::registry`]).

use super::error::{AdminError, Result};
use super::http::AdminHttpClient;
use crate::provider::ProviderConfig;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Admin REST API version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V2,
    V3,
}

impl ApiVersion {
    /// Parse the `api_version` setting ("2", "3", "v2", "v3")
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().trim_start_matches('v') {
            "2" => Some(ApiVersion::V2),
            "3" => Some(ApiVersion::V3),
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            ApiVersion::V2 => "v2",
            ApiVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Authenticated handle to the admin API at a given version
#[derive(Clone)]
pub struct PulsarAdmin {
    id: Uuid,
    pub http: AdminHttpClient,
    pub web_service_url: String,
    pub api_version: ApiVersion,
    token: Option<String>,
}

impl fmt::Debug for PulsarAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // token omitted
        f.debug_struct("PulsarAdmin")
            .field("id", &self.id)
            .field("web_service_url", &self.web_service_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl PulsarAdmin {
    /// Create a new admin handle
    pub fn new(config: &ProviderConfig, api_version: ApiVersion) -> Result<Self> {
        let base = config.web_service_url.trim_end_matches('/').to_string();
        url::Url::parse(&base).map_err(|e| AdminError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;

        let http = AdminHttpClient::new(
            config.tls_allow_insecure_connection,
            config.request_timeout_secs.map(Duration::from_secs),
        )?;

        Ok(Self {
            id: Uuid::new_v4(),
            http,
            web_service_url: base,
            api_version,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Identity of this handle, stable for its lifetime and shared by clones
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Build an admin URL; every segment is percent-encoded
    pub fn admin_url(&self, resource: &str, segments: &[&str]) -> String {
        let mut url = format!(
            "{}/admin/{}/{}",
            self.web_service_url, self.api_version, resource
        );
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Make a GET request to the admin API
    pub async fn get(&self, url: &str) -> Result<Value> {
        self.http.get(url, self.token()).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, url: &str, body: &Value) -> Result<Value> {
        self.http
            .send_json(Method::PUT, url, self.token(), body)
            .await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        self.http
            .send_json(Method::POST, url, self.token(), body)
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str) -> Result<Value> {
        self.http.delete(url, self.token()).await
    }
}
