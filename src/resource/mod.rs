//! Resource abstraction layer
//!
//! Every managed object type implements [`Resource`]: four lifecycle calls,
//! an existence probe and an import adapter, all operating on host-owned
//! state through [`ResourceData`].
//!
//! # Architecture
//!
//! - [`data`] - Attribute values and the state accessor
//! - [`schema`] - Attribute declarations, defaults and validation
//! - [`payload`] - Local-path vs URL routing for artifacts
//! - [`sink`], [`function`], [`tenant`] - Resource types
//!
//! # Reconciliation rules
//!
//! - Create probes existence first and degrades to a read when the object is
//!   already there.
//! - Existence is "GET and treat 404 as absent", never a list-and-search.
//! - Read clears the identity on 404 instead of failing.
//! - Attributes the admin API never echoes back (sink `archive` and
//!   `inputs`, function code paths) are left alone on read.

pub mod data;
pub mod function;
pub mod payload;
pub mod schema;
pub mod sink;
pub mod tenant;

use crate::error::Result;
use crate::provider::ProviderMeta;
use async_trait::async_trait;

pub use data::{attributes_from_json, AttrValue, AttributeBag, ResourceData};
pub use function::FunctionResource;
pub use schema::{AttrKind, AttributeSchema, ResourceSchema};
pub use sink::SinkResource;
pub use tenant::TenantResource;

pub const TENANT: &str = "tenant";
pub const NAMESPACE: &str = "namespace";
pub const INPUTS: &str = "inputs";
pub const PARALLELISM: &str = "parallelism";
pub const PROCESSING_GUARANTEES: &str = "processing_guarantees";

/// Host-owned state as seen by a handler
pub type ResourceState = dyn ResourceData + Send + Sync;

/// Lifecycle of one resource type
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name as registered with the host, e.g. `pulsar_sink`
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> ResourceSchema;

    async fn create(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()>;

    async fn read(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()>;

    async fn update(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()>;

    async fn delete(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()>;

    async fn exists(&self, d: &ResourceState, meta: &ProviderMeta) -> Result<bool>;

    /// Populate state from the import id held in `d.id()`, then read
    async fn import(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()>;
}

/// All resource types served by the provider
pub fn resources() -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(FunctionResource),
        Box::new(SinkResource),
        Box::new(TenantResource),
    ]
}

/// Get a resource type by name
pub fn get_resource(type_name: &str) -> Option<Box<dyn Resource>> {
    resources().into_iter().find(|r| r.type_name() == type_name)
}

/// Get all resource type names (for help output)
pub fn get_all_resource_types() -> Vec<&'static str> {
    resources().iter().map(|r| r.type_name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_table() {
        assert_eq!(
            get_all_resource_types(),
            vec!["pulsar_function", "pulsar_sink", "pulsar_tenant"]
        );
        assert!(get_resource("pulsar_sink").is_some());
        assert!(get_resource("pulsar_topic").is_none());
    }

    #[test]
    fn test_every_schema_declares_its_key_attributes() {
        for resource in resources() {
            let schema = resource.schema();
            assert!(
                schema.attribute(TENANT).is_some(),
                "{} has no tenant attribute",
                resource.type_name()
            );
        }
    }
}
