//! Tenant endpoints (`/admin/v2/tenants`)

use super::client::PulsarAdmin;
use super::error::Result;
use super::types::TenantInfo;

const TENANTS: &str = "tenants";

/// Tenant operations of an admin handle
pub struct Tenants<'a> {
    admin: &'a PulsarAdmin,
}

impl PulsarAdmin {
    pub fn tenants(&self) -> Tenants<'_> {
        Tenants { admin: self }
    }
}

impl Tenants<'_> {
    fn url(&self, tenant: &str) -> String {
        self.admin.admin_url(TENANTS, &[tenant])
    }

    pub async fn get_tenant(&self, tenant: &str) -> Result<TenantInfo> {
        let value = self.admin.get(&self.url(tenant)).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn create_tenant(&self, tenant: &str, info: &TenantInfo) -> Result<()> {
        self.admin
            .put(&self.url(tenant), &serde_json::to_value(info)?)
            .await?;
        Ok(())
    }

    pub async fn update_tenant(&self, tenant: &str, info: &TenantInfo) -> Result<()> {
        self.admin
            .post(&self.url(tenant), &serde_json::to_value(info)?)
            .await?;
        Ok(())
    }

    pub async fn delete_tenant(&self, tenant: &str) -> Result<()> {
        self.admin.delete(&self.url(tenant)).await?;
        Ok(())
    }
}
