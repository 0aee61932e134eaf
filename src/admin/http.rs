//! HTTP utilities for Pulsar admin REST calls

use super::error::{AdminError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Pull the human readable reason out of an admin error body.
/// Pulsar answers `{"reason": "..."}`; anything else is passed through.
fn error_reason(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("reason").and_then(|r| r.as_str()).map(String::from))
        .unwrap_or_else(|| sanitize_for_log(body))
}

/// HTTP client wrapper for admin API calls
#[derive(Clone)]
pub struct AdminHttpClient {
    client: Client,
}

impl AdminHttpClient {
    /// Create a new HTTP client
    pub fn new(allow_insecure: bool, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("pulsar-provider/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(allow_insecure);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    fn request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        let request = self.client.request(method, url);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request and parse the JSON answer
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Value> {
        let response = self.request(Method::GET, url, token).send().await?;
        read_json(response).await
    }

    /// Send a JSON body with PUT or POST
    pub async fn send_json(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<Value> {
        let response = self.request(method, url, token).json(body).send().await?;
        read_json(response).await
    }

    /// Send a multipart form with PUT or POST
    pub async fn send_multipart(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        form: Form,
    ) -> Result<Value> {
        let response = self
            .request(method, url, token)
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str, token: Option<&str>) -> Result<Value> {
        let response = self.request(Method::DELETE, url, token).send().await?;
        read_json(response).await
    }
}

/// Multipart part holding a local artifact (jar, nar, py, go binary)
pub async fn file_part(path: &str) -> Result<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AdminError::Artifact {
            path: path.to_string(),
            source,
        })?;
    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());

    Ok(Part::bytes(bytes).file_name(file_name))
}

/// Multipart part holding a JSON document
pub fn json_part<T: Serialize>(value: &T) -> Result<Part> {
    let text = serde_json::to_string(value)?;
    Ok(Part::text(text).mime_str("application/json")?)
}

async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        // Only log sanitized/truncated error body to avoid leaking sensitive data
        tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
        return Err(AdminError::Api {
            code: status.as_u16(),
            reason: error_reason(&body),
        });
    }

    // Handle empty response
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reason_prefers_json_reason() {
        let body = r#"{"reason":"Sink my-sink doesn't exist"}"#;
        assert_eq!(error_reason(body), "Sink my-sink doesn't exist");
    }

    #[test]
    fn test_error_reason_falls_back_to_body() {
        assert_eq!(error_reason("Not Found"), "Not Found");
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("line1\nline2\r"), "line1line2");
    }
}
