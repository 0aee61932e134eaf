//! Function endpoints (`/admin/{version}/functions`)

use super::client::PulsarAdmin;
use super::error::Result;
use super::http::{file_part, json_part};
use super::types::{FunctionConfig, UpdateOptions};
use reqwest::multipart::Form;
use reqwest::Method;

const FUNCTIONS: &str = "functions";

/// Function operations of an admin handle
pub struct Functions<'a> {
    admin: &'a PulsarAdmin,
}

impl PulsarAdmin {
    pub fn functions(&self) -> Functions<'_> {
        Functions { admin: self }
    }
}

impl Functions<'_> {
    fn url(&self, tenant: &str, namespace: &str, name: &str) -> String {
        self.admin.admin_url(FUNCTIONS, &[tenant, namespace, name])
    }

    async fn send(&self, method: Method, config: &FunctionConfig, form: Form) -> Result<()> {
        let url = self.url(&config.tenant, &config.namespace, &config.name);
        self.admin
            .http
            .send_multipart(method, &url, self.admin.token(), form)
            .await?;
        Ok(())
    }

    pub async fn get_function(
        &self,
        tenant: &str,
        namespace: &str,
        name: &str,
    ) -> Result<FunctionConfig> {
        let value = self.admin.get(&self.url(tenant, namespace, name)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create a function, uploading its code from a local path
    pub async fn create_func(&self, config: &FunctionConfig, code_file: &str) -> Result<()> {
        let form = Form::new()
            .part("data", file_part(code_file).await?)
            .part("functionConfig", json_part(config)?);
        self.send(Method::POST, config, form).await
    }

    /// Create a function whose package the broker fetches from a URL
    pub async fn create_func_with_url(&self, config: &FunctionConfig, code_url: &str) -> Result<()> {
        let form = Form::new()
            .text("url", code_url.to_string())
            .part("functionConfig", json_part(config)?);
        self.send(Method::POST, config, form).await
    }

    pub async fn update_function(
        &self,
        config: &FunctionConfig,
        code_file: &str,
        options: &UpdateOptions,
    ) -> Result<()> {
        let mut form = Form::new()
            .part("functionConfig", json_part(config)?)
            .part("updateOptions", json_part(options)?);
        if !code_file.is_empty() {
            form = form.part("data", file_part(code_file).await?);
        }
        self.send(Method::PUT, config, form).await
    }

    pub async fn update_function_with_url(
        &self,
        config: &FunctionConfig,
        code_url: &str,
        options: &UpdateOptions,
    ) -> Result<()> {
        let form = Form::new()
            .text("url", code_url.to_string())
            .part("functionConfig", json_part(config)?)
            .part("updateOptions", json_part(options)?);
        self.send(Method::PUT, config, form).await
    }

    pub async fn delete_function(&self, tenant: &str, namespace: &str, name: &str) -> Result<()> {
        self.admin.delete(&self.url(tenant, namespace, name)).await?;
        Ok(())
    }
}
