//! Admin API errors

use thiserror::Error;

/// Status code the admin API answers with when an object does not exist
pub const NOT_FOUND: u16 = 404;

/// Error returned by every admin client call
#[derive(Debug, Error)]
pub enum AdminError {
    /// Non-2xx answer from the admin API
    #[error("code: {code} reason: {reason}")]
    Api { code: u16, reason: String },

    /// Connection, TLS or protocol failure before a status was received
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Local artifact could not be read for upload
    #[error("failed to read {path}: {source}")]
    Artifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Response body was not the expected JSON
    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot be used
    #[error("invalid web service url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl AdminError {
    /// True when the admin API reported the object as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdminError::Api { code, .. } if *code == NOT_FOUND)
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
