//! `pulsar_sink` resource
//!
//! Sinks are only served on `/admin/v3`, so every call goes through the
//! shadow handle of the configured client.

use super::data::AttrValue;
use super::payload::{resolve_archive, Payload};
use super::schema::{AttrKind, AttributeSchema, ResourceSchema};
use super::{
    Resource, ResourceState, INPUTS, NAMESPACE, PARALLELISM, PROCESSING_GUARANTEES, TENANT,
};
use crate::admin::types::{SinkConfig, UpdateOptions};
use crate::error::{ProviderError, Result};
use crate::provider::ProviderMeta;
use crate::validate::{
    Validator, PROCESSING_GUARANTEES as GUARANTEES, PROCESSING_GUARANTEE_EFFECTIVELY_ONCE,
};
use async_trait::async_trait;

pub const SINK: &str = "sink";
pub const ARCHIVE: &str = "archive";
pub const RETAIN_ORDERING: &str = "retain_ordering";
pub const CONFIGS: &str = "configs";
pub const CUSTOM_RUNTIME_OPTIONS: &str = "custom_runtime_options";

#[derive(Debug, Clone, Copy, Default)]
pub struct SinkResource;

fn sink_key(d: &ResourceState) -> (String, String, String) {
    (d.get_str(TENANT), d.get_str(NAMESPACE), d.get_str(SINK))
}

/// Build the admin request from state
pub fn marshal_sink_data(d: &ResourceState) -> SinkConfig {
    let archive = d.get_str(ARCHIVE);
    let custom_runtime_options = d.get_str(CUSTOM_RUNTIME_OPTIONS);

    SinkConfig {
        tenant: d.get_str(TENANT),
        namespace: d.get_str(NAMESPACE),
        name: d.get_str(SINK),
        archive: (!archive.is_empty()).then_some(archive),
        parallelism: d.get_int(PARALLELISM),
        inputs: d.get_list(INPUTS),
        configs: d
            .get_map(CONFIGS)
            .into_iter()
            .map(|(k, v)| (k, v.to_json()))
            .collect(),
        retain_ordering: d.get_bool(RETAIN_ORDERING),
        processing_guarantees: Some(d.get_str(PROCESSING_GUARANTEES)).filter(|p| !p.is_empty()),
        custom_runtime_options: (!custom_runtime_options.is_empty())
            .then_some(custom_runtime_options),
        ..Default::default()
    }
}

/// Copy the remote definition into state.
/// `archive` and `inputs` are never returned by the admin API; writing them
/// here would show up as drift on every plan, so they stay as configured.
pub fn unmarshal_sink_data(d: &mut ResourceState, sink: &SinkConfig) {
    for (key, value) in [
        (TENANT, &sink.tenant),
        (NAMESPACE, &sink.namespace),
        (SINK, &sink.name),
    ] {
        if !value.is_empty() {
            d.set(key, value.as_str().into());
        }
    }

    d.set(PARALLELISM, sink.parallelism.into());
    d.set(
        CONFIGS,
        AttrValue::Map(
            sink.configs
                .iter()
                .filter_map(|(k, v)| AttrValue::from_json(v).map(|v| (k.clone(), v)))
                .collect(),
        ),
    );
    d.set(RETAIN_ORDERING, sink.retain_ordering.into());
    if let Some(guarantees) = &sink.processing_guarantees {
        d.set(PROCESSING_GUARANTEES, guarantees.as_str().into());
    }
    d.set(
        CUSTOM_RUNTIME_OPTIONS,
        sink.custom_runtime_options.clone().unwrap_or_default().into(),
    );
}

#[async_trait]
impl Resource for SinkResource {
    fn type_name(&self) -> &'static str {
        "pulsar_sink"
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(vec![
            AttributeSchema::required(SINK, AttrKind::String)
                .describe("Name of the sink"),
            AttributeSchema::required(TENANT, AttrKind::String)
                .describe("Tenant owning the sink"),
            AttributeSchema::required(NAMESPACE, AttrKind::String)
                .describe("Namespace holding the sink"),
            AttributeSchema::optional(ARCHIVE, AttrKind::String).describe(
                "Path to the sink package, or an http://, https:// or file:// URL the broker fetches",
            ),
            AttributeSchema::optional(PARALLELISM, AttrKind::Int)
                .with_default(1i64)
                .validate(Validator::GtEq0)
                .describe("Number of sink instances"),
            AttributeSchema::optional(PROCESSING_GUARANTEES, AttrKind::String)
                .force_new()
                .with_default(PROCESSING_GUARANTEE_EFFECTIVELY_ONCE)
                .validate(Validator::OneOf(GUARANTEES))
                .describe("Delivery semantics"),
            AttributeSchema::optional(RETAIN_ORDERING, AttrKind::Bool)
                .with_default(true)
                .describe("Consume input messages in order"),
            AttributeSchema::required(INPUTS, AttrKind::List)
                .min_items(1)
                .force_new()
                .validate_elem(Validator::NotBlank)
                .describe("Topics the sink consumes from"),
            AttributeSchema::optional(CONFIGS, AttrKind::Map)
                .describe("Connector specific configuration"),
            AttributeSchema::optional(CUSTOM_RUNTIME_OPTIONS, AttrKind::String)
                .describe("Options passed to a custom runtime"),
        ])
    }

    async fn create(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let payload = resolve_archive(&d.get_str(ARCHIVE))?;

        if self.exists(d, meta).await? {
            tracing::info!("Sink {} already exists, reading it back", d.get_str(SINK));
            return self.read(d, meta).await;
        }

        let config = marshal_sink_data(d);
        tracing::info!(
            "Creating sink {}/{}/{} (archive by {})",
            config.tenant,
            config.namespace,
            config.name,
            if payload.is_url() { "url" } else { "upload" }
        );

        let client = meta.v3_client();
        let sinks = client.sinks();
        let created = match &payload {
            Payload::Url(url) => sinks.create_sink_with_url(&config, url).await,
            Payload::Local(path) => sinks.create_sink(&config, path).await,
        };
        created.map_err(ProviderError::remote("ERROR_CREATE_SINK"))?;

        d.set(SINK, config.name.as_str().into());
        self.read(d, meta).await
    }

    async fn read(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let (tenant, namespace, name) = sink_key(d);

        match meta.v3_client().sinks().get_sink(&tenant, &namespace, &name).await {
            Ok(sink) => {
                unmarshal_sink_data(d, &sink);
                d.set_id(&name);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("Sink {}/{}/{} not found, clearing state", tenant, namespace, name);
                d.set_id("");
                Ok(())
            }
            Err(e) => Err(ProviderError::remote("ERROR_READ_SINK_DATA")(e)),
        }
    }

    async fn update(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let config = marshal_sink_data(d);
        // empty archive keeps the deployed package
        let payload = Payload::route(&d.get_str(ARCHIVE));
        let options = UpdateOptions {
            update_auth_data: true,
        };

        tracing::info!(
            "Updating sink {}/{}/{}",
            config.tenant,
            config.namespace,
            config.name
        );

        let client = meta.v3_client();
        let sinks = client.sinks();
        let updated = match &payload {
            Payload::Url(url) => sinks.update_sink_with_url(&config, url, &options).await,
            Payload::Local(path) => sinks.update_sink(&config, path, &options).await,
        };
        updated.map_err(ProviderError::remote("ERROR_UPDATE_SINK"))
    }

    async fn delete(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let (tenant, namespace, name) = sink_key(d);
        tracing::info!("Deleting sink {}/{}/{}", tenant, namespace, name);

        meta.v3_client()
            .sinks()
            .delete_sink(&tenant, &namespace, &name)
            .await
            .map_err(ProviderError::remote("ERROR_DELETE_SINK"))?;

        d.set(SINK, "".into());
        d.set_id("");
        Ok(())
    }

    async fn exists(&self, d: &ResourceState, meta: &ProviderMeta) -> Result<bool> {
        let (tenant, namespace, name) = sink_key(d);

        match meta.v3_client().sinks().get_sink(&tenant, &namespace, &name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(ProviderError::remote("ERROR_READ_SINK_DATA")(e)),
        }
    }

    async fn import(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let id = d.id().to_string();
        let parts: Vec<&str> = id.split('/').collect();
        let [tenant, namespace, sink] = parts.as_slice() else {
            return Err(ProviderError::InvalidImportId(
                "the import address has to be tenant/namespace/sink".to_string(),
            ));
        };

        d.set(TENANT, (*tenant).into());
        d.set(NAMESPACE, (*namespace).into());
        d.set(SINK, (*sink).into());
        d.set_id(sink);

        self.read(d, meta).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::data::{AttributeBag, ResourceData};
    use serde_json::json;

    fn bag() -> AttributeBag {
        AttributeBag::new()
            .with(TENANT, "public")
            .with(NAMESPACE, "default")
            .with(SINK, "s3")
            .with(ARCHIVE, "https://example.com/s3.nar")
            .with(PARALLELISM, 2i64)
            .with(INPUTS, vec!["persistent://public/default/in".to_string()])
            .with(RETAIN_ORDERING, true)
            .with(PROCESSING_GUARANTEES, "ATLEAST_ONCE")
    }

    #[test]
    fn test_marshal_sink_data() {
        let config = marshal_sink_data(&bag());
        assert_eq!(config.name, "s3");
        assert_eq!(config.archive.as_deref(), Some("https://example.com/s3.nar"));
        assert_eq!(config.inputs, vec!["persistent://public/default/in"]);
        assert_eq!(config.parallelism, 2);
        assert!(config.retain_ordering);
        assert!(config.custom_runtime_options.is_none());
    }

    #[test]
    fn test_unmarshal_leaves_archive_and_inputs() {
        let mut state = bag();
        let remote = SinkConfig {
            tenant: "public".to_string(),
            namespace: "default".to_string(),
            name: "s3".to_string(),
            parallelism: 3,
            configs: [("bucket".to_string(), json!("logs"))].into_iter().collect(),
            processing_guarantees: Some("ATLEAST_ONCE".to_string()),
            ..Default::default()
        };

        unmarshal_sink_data(&mut state, &remote);

        assert_eq!(state.get_str(ARCHIVE), "https://example.com/s3.nar");
        assert_eq!(state.get_list(INPUTS), vec!["persistent://public/default/in"]);
        assert_eq!(state.get_int(PARALLELISM), 3);
        assert!(!state.get_bool(RETAIN_ORDERING));
        assert_eq!(state.get_map(CONFIGS)["bucket"], AttrValue::from("logs"));
        assert_eq!(state.get_str(CUSTOM_RUNTIME_OPTIONS), "");
    }

    #[test]
    fn test_schema_defaults() {
        let mut state = AttributeBag::new();
        SinkResource.schema().apply_defaults(&mut state);
        assert_eq!(state.get_int(PARALLELISM), 1);
        assert_eq!(state.get_str(PROCESSING_GUARANTEES), "EFFECTIVELY_ONCE");
        assert!(state.get_bool(RETAIN_ORDERING));
    }
}
