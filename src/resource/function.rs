//! `pulsar_function` resource, served by the primary handle

use super::payload::{resolve_function_code, FunctionCode, Payload};
use super::schema::{AttrKind, AttributeSchema, ResourceSchema};
use super::{
    Resource, ResourceState, INPUTS, NAMESPACE, PARALLELISM, PROCESSING_GUARANTEES, TENANT,
};
use crate::admin::types::{FunctionConfig, FunctionRuntime, UpdateOptions};
use crate::error::{ProviderError, Result};
use crate::provider::ProviderMeta;
use crate::validate::{
    Validator, PROCESSING_GUARANTEES as GUARANTEES, PROCESSING_GUARANTEE_ATLEAST_ONCE,
    SUBSCRIPTION_POSITIONS, SUBSCRIPTION_POSITION_LATEST,
};
use async_trait::async_trait;

pub const FUNCTION: &str = "function";
pub const GO: &str = "go";
pub const JAR: &str = "jar";
pub const PY: &str = "py";
pub const CLASSNAME: &str = "classname";
pub const OUTPUT: &str = "output";
pub const SUBSCRIPTION_POSITION: &str = "subscription_position";

#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionResource;

fn function_key(d: &ResourceState) -> (String, String, String) {
    (d.get_str(TENANT), d.get_str(NAMESPACE), d.get_str(FUNCTION))
}

fn function_code(d: &ResourceState) -> Result<FunctionCode> {
    resolve_function_code(&d.get_str(GO), &d.get_str(JAR), &d.get_str(PY))
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Build the admin request from state and the resolved code source
pub fn marshal_function_data(d: &ResourceState, code: &FunctionCode) -> FunctionConfig {
    let mut config = FunctionConfig {
        tenant: d.get_str(TENANT),
        namespace: d.get_str(NAMESPACE),
        name: d.get_str(FUNCTION),
        class_name: non_empty(d.get_str(CLASSNAME)),
        inputs: d.get_list(INPUTS),
        output: non_empty(d.get_str(OUTPUT)),
        parallelism: d.get_int(PARALLELISM),
        processing_guarantees: non_empty(d.get_str(PROCESSING_GUARANTEES)),
        subscription_position: non_empty(d.get_str(SUBSCRIPTION_POSITION)),
        runtime: Some(code.runtime),
        ..Default::default()
    };

    let source = Some(code.payload.as_str().to_string());
    match code.runtime {
        FunctionRuntime::Go => config.go = source,
        FunctionRuntime::Java => config.jar = source,
        FunctionRuntime::Python => config.py = source,
    }
    config
}

/// Copy the remote definition into state; code paths stay as configured
pub fn unmarshal_function_data(d: &mut ResourceState, function: &FunctionConfig) {
    for (key, value) in [
        (TENANT, &function.tenant),
        (NAMESPACE, &function.namespace),
        (FUNCTION, &function.name),
    ] {
        if !value.is_empty() {
            d.set(key, value.as_str().into());
        }
    }

    if let Some(class_name) = &function.class_name {
        d.set(CLASSNAME, class_name.as_str().into());
    }
    if !function.inputs.is_empty() {
        d.set(INPUTS, function.inputs.clone().into());
    }
    if let Some(output) = &function.output {
        d.set(OUTPUT, output.as_str().into());
    }
    d.set(PARALLELISM, function.parallelism.into());
    if let Some(guarantees) = &function.processing_guarantees {
        d.set(PROCESSING_GUARANTEES, guarantees.as_str().into());
    }
    if let Some(position) = &function.subscription_position {
        d.set(SUBSCRIPTION_POSITION, position.as_str().into());
    }
}

#[async_trait]
impl Resource for FunctionResource {
    fn type_name(&self) -> &'static str {
        "pulsar_function"
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(vec![
            AttributeSchema::required(FUNCTION, AttrKind::String)
                .describe("Name of the function"),
            AttributeSchema::required(TENANT, AttrKind::String),
            AttributeSchema::required(NAMESPACE, AttrKind::String),
            AttributeSchema::optional(GO, AttrKind::String)
                .describe("Go binary to deploy, path or URL"),
            AttributeSchema::optional(JAR, AttrKind::String)
                .describe("Java jar to deploy, path or URL"),
            AttributeSchema::optional(PY, AttrKind::String)
                .describe("Python file to deploy, path or URL"),
            AttributeSchema::optional(CLASSNAME, AttrKind::String),
            AttributeSchema::optional(INPUTS, AttrKind::List).validate_elem(Validator::NotBlank),
            AttributeSchema::optional(OUTPUT, AttrKind::String),
            AttributeSchema::optional(PARALLELISM, AttrKind::Int)
                .with_default(1i64)
                .validate(Validator::GtEq0),
            AttributeSchema::optional(PROCESSING_GUARANTEES, AttrKind::String)
                .with_default(PROCESSING_GUARANTEE_ATLEAST_ONCE)
                .validate(Validator::OneOf(GUARANTEES)),
            AttributeSchema::optional(SUBSCRIPTION_POSITION, AttrKind::String)
                .with_default(SUBSCRIPTION_POSITION_LATEST)
                .validate(Validator::OneOf(SUBSCRIPTION_POSITIONS)),
        ])
    }

    async fn create(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let code = function_code(d)?;

        if self.exists(d, meta).await? {
            tracing::info!(
                "Function {} already exists, reading it back",
                d.get_str(FUNCTION)
            );
            return self.read(d, meta).await;
        }

        let config = marshal_function_data(d, &code);
        tracing::info!(
            "Creating function {}/{}/{} ({:?})",
            config.tenant,
            config.namespace,
            config.name,
            code.runtime
        );

        let functions = meta.client().functions();
        let created = match &code.payload {
            Payload::Url(url) => functions.create_func_with_url(&config, url).await,
            Payload::Local(path) => functions.create_func(&config, path).await,
        };
        created.map_err(ProviderError::remote("ERROR_CREATE_FUNCTION"))?;

        d.set(FUNCTION, config.name.as_str().into());
        self.read(d, meta).await
    }

    async fn read(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let (tenant, namespace, name) = function_key(d);

        match meta
            .client()
            .functions()
            .get_function(&tenant, &namespace, &name)
            .await
        {
            Ok(function) => {
                unmarshal_function_data(d, &function);
                d.set_id(&name);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "Function {}/{}/{} not found, clearing state",
                    tenant,
                    namespace,
                    name
                );
                d.set_id("");
                Ok(())
            }
            Err(e) => Err(ProviderError::remote("ERROR_READ_FUNCTION_DATA")(e)),
        }
    }

    async fn update(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let code = function_code(d)?;
        let config = marshal_function_data(d, &code);
        let options = UpdateOptions {
            update_auth_data: true,
        };

        tracing::info!(
            "Updating function {}/{}/{}",
            config.tenant,
            config.namespace,
            config.name
        );

        let functions = meta.client().functions();
        let updated = match &code.payload {
            Payload::Url(url) => {
                functions
                    .update_function_with_url(&config, url, &options)
                    .await
            }
            Payload::Local(path) => functions.update_function(&config, path, &options).await,
        };
        updated.map_err(ProviderError::remote("ERROR_UPDATE_FUNCTION"))
    }

    async fn delete(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let (tenant, namespace, name) = function_key(d);
        tracing::info!("Deleting function {}/{}/{}", tenant, namespace, name);

        meta.client()
            .functions()
            .delete_function(&tenant, &namespace, &name)
            .await
            .map_err(ProviderError::remote("ERROR_DELETE_FUNCTION"))?;

        d.set(FUNCTION, "".into());
        d.set_id("");
        Ok(())
    }

    async fn exists(&self, d: &ResourceState, meta: &ProviderMeta) -> Result<bool> {
        let (tenant, namespace, name) = function_key(d);

        match meta
            .client()
            .functions()
            .get_function(&tenant, &namespace, &name)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(ProviderError::remote("ERROR_READ_FUNCTION_DATA")(e)),
        }
    }

    /// Import id is the bare function name; tenant and namespace come from
    /// the configuration already in state
    async fn import(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let id = d.id().to_string();
        if id.is_empty() || id.contains('/') {
            return Err(ProviderError::InvalidImportId(
                "the import address has to be the function name".to_string(),
            ));
        }

        d.set(FUNCTION, id.as_str().into());
        self.read(d, meta).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::data::{AttributeBag, ResourceData};

    fn bag() -> AttributeBag {
        AttributeBag::new()
            .with(TENANT, "public")
            .with(NAMESPACE, "default")
            .with(FUNCTION, "exclaim")
            .with(PY, "/tmp/exclaim.py")
            .with(CLASSNAME, "exclaim.Exclaim")
            .with(INPUTS, vec!["persistent://public/default/in".to_string()])
            .with(PARALLELISM, 1i64)
    }

    #[test]
    fn test_marshal_sets_only_selected_code_field() {
        let state = bag();
        let code = function_code(&state).unwrap();
        let config = marshal_function_data(&state, &code);

        assert_eq!(config.runtime, Some(FunctionRuntime::Python));
        assert_eq!(config.py.as_deref(), Some("/tmp/exclaim.py"));
        assert!(config.jar.is_none());
        assert!(config.go.is_none());
        assert_eq!(config.class_name.as_deref(), Some("exclaim.Exclaim"));
        assert!(config.output.is_none());
    }

    #[test]
    fn test_unmarshal_leaves_code_paths() {
        let mut state = bag();
        let remote = FunctionConfig {
            tenant: "public".to_string(),
            namespace: "default".to_string(),
            name: "exclaim".to_string(),
            parallelism: 2,
            py: Some("function://public/default/exclaim@1".to_string()),
            ..Default::default()
        };

        unmarshal_function_data(&mut state, &remote);

        assert_eq!(state.get_str(PY), "/tmp/exclaim.py");
        assert_eq!(state.get_int(PARALLELISM), 2);
        assert_eq!(state.get_list(INPUTS), vec!["persistent://public/default/in"]);
    }
}
