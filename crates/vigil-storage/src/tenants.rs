//! Tenant registry
//!
//! Organizations and their environments. A tenant exists exactly when its
//! environment record exists; every tenant-scoped store validates writes
//! against this registry instead of keeping its own copy of tenant state.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use vigil_core::{Error, KvStore, RequestContext, Result, TenantKey};

use crate::codec::{decode_listing, encode};
use crate::keys;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub organization: String,
    pub name: String,

    #[serde(default)]
    pub description: String,
}

impl Environment {
    pub fn tenant(&self) -> Result<TenantKey> {
        TenantKey::new(self.organization.clone(), self.name.clone())
    }
}

/// Registry of organizations and environments
pub struct TenantStore {
    kv: Arc<dyn KvStore>,
}

impl TenantStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Create or replace an organization.
    pub async fn create_organization(
        &self,
        ctx: &RequestContext,
        organization: &Organization,
    ) -> Result<()> {
        let key = keys::organization(&organization.name)?;
        let value = encode(organization)?;
        ctx.run(self.kv.put(&key, value)).await?;

        info!("Created organization {}", organization.name);
        Ok(())
    }

    /// Create or replace an environment inside an existing organization.
    ///
    /// # Errors
    /// - `Error::NotFound` if the organization does not exist
    pub async fn create_environment(
        &self,
        ctx: &RequestContext,
        environment: &Environment,
    ) -> Result<()> {
        let tenant = environment.tenant()?;
        let guard = keys::organization(tenant.organization())?;
        let value = encode(environment)?;

        let written = ctx
            .run(self.kv.put_if_exists(&guard, &keys::environment(&tenant), value))
            .await?;
        if !written {
            return Err(Error::NotFound(format!(
                "Organization {} does not exist",
                tenant.organization()
            )));
        }

        info!("Created environment {}", tenant);
        Ok(())
    }

    /// Create the organization and environment of `tenant` in one call.
    pub async fn ensure_tenant(&self, ctx: &RequestContext, tenant: &TenantKey) -> Result<()> {
        if self.tenant_exists(ctx, tenant).await? {
            return Ok(());
        }

        let organization_key = keys::organization(tenant.organization())?;
        if !ctx.run(self.kv.exists(&organization_key)).await? {
            self.create_organization(
                ctx,
                &Organization {
                    name: tenant.organization().to_string(),
                    description: String::new(),
                },
            )
            .await?;
        }

        self.create_environment(
            ctx,
            &Environment {
                organization: tenant.organization().to_string(),
                name: tenant.environment().to_string(),
                description: String::new(),
            },
        )
        .await
    }

    pub async fn tenant_exists(&self, ctx: &RequestContext, tenant: &TenantKey) -> Result<bool> {
        ctx.run(self.kv.exists(&keys::environment(tenant))).await
    }

    pub async fn list_environments(
        &self,
        ctx: &RequestContext,
        organization: &str,
    ) -> Result<Vec<Environment>> {
        let prefix = keys::environments_prefix(organization)?;
        let pairs = ctx.run(self.kv.list_prefix(&prefix)).await?;
        Ok(decode_listing(pairs))
    }

    /// Remove an environment. Resources stored under it become unwritable
    /// until it is created again.
    pub async fn delete_environment(&self, ctx: &RequestContext, tenant: &TenantKey) -> Result<()> {
        let removed = ctx.run(self.kv.delete(&keys::environment(tenant))).await?;
        debug!(tenant = %tenant, removed, "Deleted environment");
        Ok(())
    }

    /// Write `value` at `key`, atomically requiring that `tenant` exists.
    ///
    /// # Errors
    /// - `Error::NotFound` if the tenant does not exist; nothing is written
    pub async fn put_scoped(
        &self,
        ctx: &RequestContext,
        tenant: &TenantKey,
        key: &str,
        value: Vec<u8>,
    ) -> Result<()> {
        let guard = keys::environment(tenant);
        let written = ctx.run(self.kv.put_if_exists(&guard, key, value)).await?;
        if !written {
            return Err(Error::NotFound(format!("Tenant {} does not exist", tenant)));
        }
        Ok(())
    }
}
