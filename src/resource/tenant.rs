//! `pulsar_tenant` resource, served by the primary handle

use super::schema::{AttrKind, AttributeSchema, ResourceSchema};
use super::{Resource, ResourceState, TENANT};
use crate::admin::types::TenantInfo;
use crate::error::{ProviderError, Result};
use crate::provider::ProviderMeta;
use crate::validate::Validator;
use async_trait::async_trait;

pub const ADMIN_ROLES: &str = "admin_roles";
pub const ALLOWED_CLUSTERS: &str = "allowed_clusters";

#[derive(Debug, Clone, Copy, Default)]
pub struct TenantResource;

fn marshal_tenant_data(d: &ResourceState) -> TenantInfo {
    TenantInfo {
        admin_roles: d.get_list(ADMIN_ROLES),
        allowed_clusters: d.get_list(ALLOWED_CLUSTERS),
    }
}

#[async_trait]
impl Resource for TenantResource {
    fn type_name(&self) -> &'static str {
        "pulsar_tenant"
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(vec![
            AttributeSchema::required(TENANT, AttrKind::String)
                .validate(Validator::NotBlank)
                .describe("Name of the tenant"),
            AttributeSchema::optional(ADMIN_ROLES, AttrKind::List)
                .validate_elem(Validator::NotBlank)
                .describe("Roles allowed to administer the tenant"),
            AttributeSchema::optional(ALLOWED_CLUSTERS, AttrKind::List)
                .validate_elem(Validator::NotBlank)
                .describe("Clusters the tenant may use"),
        ])
    }

    async fn create(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        if self.exists(d, meta).await? {
            return self.read(d, meta).await;
        }

        let tenant = d.get_str(TENANT);
        tracing::info!("Creating tenant {}", tenant);

        meta.client()
            .tenants()
            .create_tenant(&tenant, &marshal_tenant_data(d))
            .await
            .map_err(ProviderError::remote("ERROR_CREATE_TENANT"))?;

        self.read(d, meta).await
    }

    async fn read(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let tenant = d.get_str(TENANT);

        match meta.client().tenants().get_tenant(&tenant).await {
            Ok(info) => {
                d.set(ADMIN_ROLES, info.admin_roles.into());
                d.set(ALLOWED_CLUSTERS, info.allowed_clusters.into());
                d.set_id(&tenant);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("Tenant {} not found, clearing state", tenant);
                d.set_id("");
                Ok(())
            }
            Err(e) => Err(ProviderError::remote("ERROR_READ_TENANT")(e)),
        }
    }

    async fn update(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let tenant = d.get_str(TENANT);
        tracing::info!("Updating tenant {}", tenant);

        meta.client()
            .tenants()
            .update_tenant(&tenant, &marshal_tenant_data(d))
            .await
            .map_err(ProviderError::remote("ERROR_UPDATE_TENANT"))
    }

    async fn delete(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let tenant = d.get_str(TENANT);
        tracing::info!("Deleting tenant {}", tenant);

        meta.client()
            .tenants()
            .delete_tenant(&tenant)
            .await
            .map_err(ProviderError::remote("ERROR_DELETE_TENANT"))?;

        d.set_id("");
        Ok(())
    }

    async fn exists(&self, d: &ResourceState, meta: &ProviderMeta) -> Result<bool> {
        match meta.client().tenants().get_tenant(&d.get_str(TENANT)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(ProviderError::remote("ERROR_READ_TENANT")(e)),
        }
    }

    async fn import(&self, d: &mut ResourceState, meta: &ProviderMeta) -> Result<()> {
        let id = d.id().to_string();
        if id.is_empty() || id.contains('/') {
            return Err(ProviderError::InvalidImportId(
                "the import address has to be the tenant name".to_string(),
            ));
        }

        d.set(TENANT, id.as_str().into());
        self.read(d, meta).await
    }
}
