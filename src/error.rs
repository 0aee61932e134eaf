//! Provider-level errors surfaced to the plugin host

use crate::admin::AdminError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Admin API call failed; `tag` names the failing operation
    #[error("{tag}: {source}")]
    Remote {
        tag: &'static str,
        #[source]
        source: AdminError,
    },

    /// Attribute values rejected before any network call
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidImportId(String),

    #[error("invalid configuration: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("unknown resource type: {0}")]
    UnknownResource(String),
}

impl ProviderError {
    /// Closure tagging an admin error, for use with `map_err`
    pub fn remote(tag: &'static str) -> impl FnOnce(AdminError) -> ProviderError {
        move |source| ProviderError::Remote { tag, source }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
