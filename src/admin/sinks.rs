//! Sink endpoints (`/admin/v3/sinks`)

use super::client::PulsarAdmin;
use super::error::Result;
use super::http::{file_part, json_part};
use super::types::{SinkConfig, UpdateOptions};
use reqwest::multipart::Form;
use reqwest::Method;

const SINKS: &str = "sinks";

/// Sink operations of an admin handle
pub struct Sinks<'a> {
    admin: &'a PulsarAdmin,
}

impl PulsarAdmin {
    pub fn sinks(&self) -> Sinks<'_> {
        Sinks { admin: self }
    }
}

impl Sinks<'_> {
    fn url(&self, tenant: &str, namespace: &str, name: &str) -> String {
        self.admin.admin_url(SINKS, &[tenant, namespace, name])
    }

    async fn send(&self, method: Method, config: &SinkConfig, form: Form) -> Result<()> {
        let url = self.url(&config.tenant, &config.namespace, &config.name);
        self.admin
            .http
            .send_multipart(method, &url, self.admin.token(), form)
            .await?;
        Ok(())
    }

    /// Fetch the current sink definition
    pub async fn get_sink(&self, tenant: &str, namespace: &str, name: &str) -> Result<SinkConfig> {
        let value = self.admin.get(&self.url(tenant, namespace, name)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create a sink, uploading the archive from a local path
    pub async fn create_sink(&self, config: &SinkConfig, archive: &str) -> Result<()> {
        let form = Form::new()
            .part("data", file_part(archive).await?)
            .part("sinkConfig", json_part(config)?);
        self.send(Method::POST, config, form).await
    }

    /// Create a sink whose archive the broker fetches from a URL
    pub async fn create_sink_with_url(&self, config: &SinkConfig, archive_url: &str) -> Result<()> {
        let form = Form::new()
            .text("url", archive_url.to_string())
            .part("sinkConfig", json_part(config)?);
        self.send(Method::POST, config, form).await
    }

    /// Update a sink; an empty archive path keeps the deployed package
    pub async fn update_sink(
        &self,
        config: &SinkConfig,
        archive: &str,
        options: &UpdateOptions,
    ) -> Result<()> {
        let mut form = Form::new()
            .part("sinkConfig", json_part(config)?)
            .part("updateOptions", json_part(options)?);
        if !archive.is_empty() {
            form = form.part("data", file_part(archive).await?);
        }
        self.send(Method::PUT, config, form).await
    }

    /// Update a sink, pointing it at a new archive URL
    pub async fn update_sink_with_url(
        &self,
        config: &SinkConfig,
        archive_url: &str,
        options: &UpdateOptions,
    ) -> Result<()> {
        let form = Form::new()
            .text("url", archive_url.to_string())
            .part("sinkConfig", json_part(config)?)
            .part("updateOptions", json_part(options)?);
        self.send(Method::PUT, config, form).await
    }

    pub async fn delete_sink(&self, tenant: &str, namespace: &str, name: &str) -> Result<()> {
        self.admin.delete(&self.url(tenant, namespace, name)).await?;
        Ok(())
    }
}
