//! Pulsar resource provider
//!
//! Maps Pulsar functions, sinks and tenants onto a create/read/update/delete/
//! import lifecycle driven by an external plugin host.
//!
//! - [`admin`] - REST client for the Pulsar admin API
//! - [`registry`] - Primary → v3 client association
//! - [`provider`] - Configuration and per-call context
//! - [`resource`] - Resource types and their CRUD handlers
//! - [`validate`] - Attribute validators

pub mod admin;
pub mod error;
pub mod provider;
pub mod registry;
pub mod resource;
pub mod validate;

pub use error::ProviderError;
pub use provider::{Provider, ProviderConfig, ProviderMeta};
pub use resource::{get_resource, AttributeBag, Resource, ResourceData};
