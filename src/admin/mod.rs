//! Pulsar admin API interaction module
//!
//! A thin REST client covering the admin endpoints the resources need.
//!
//! # Module Structure
//!
//! - [`client`] - Admin handle bound to one API version
//! - [`http`] - HTTP utilities and error mapping
//! - [`error`] - Admin error type with not-found detection
//! - [`types`] - Request/response objects and name parsers
//! - [`sinks`], [`functions`], [`tenants`] - Per-object endpoints
//!
//! # Example
//!
//! ```ignore
//! use pulsar_provider::admin::{ApiVersion, PulsarAdmin};
//!
//! async fn example(config: &ProviderConfig) -> anyhow::Result<()> {
//!     let admin = PulsarAdmin::new(config, ApiVersion::V3)?;
//!     let sink = admin.sinks().get_sink("public", "default", "s3-sink").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod functions;
pub mod http;
pub mod sinks;
pub mod tenants;
pub mod types;

pub use client::{ApiVersion, PulsarAdmin};
pub use error::AdminError;
