//! Check configuration storage

use std::sync::Arc;
use tracing::debug;

use vigil_core::{CheckConfig, KvStore, RequestContext, Result};

use crate::codec::{decode, decode_listing, encode};
use crate::keys;
use crate::tenants::TenantStore;

pub struct CheckConfigStore {
    kv: Arc<dyn KvStore>,
    tenants: Arc<TenantStore>,
}

impl CheckConfigStore {
    pub fn new(kv: Arc<dyn KvStore>, tenants: Arc<TenantStore>) -> Self {
        Self { kv, tenants }
    }

    pub async fn get_check_configs(&self, ctx: &RequestContext) -> Result<Vec<CheckConfig>> {
        let prefix = keys::checks_prefix(ctx.tenant());
        let pairs = ctx.run(self.kv.list_prefix(&prefix)).await?;
        Ok(decode_listing(pairs))
    }

    pub async fn get_check_config_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<Option<CheckConfig>> {
        let key = keys::check(ctx.tenant(), name)?;
        match ctx.run(self.kv.get(&key)).await? {
            Some(bytes) => decode(&key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    pub async fn update_check_config(&self, ctx: &RequestContext, check: &CheckConfig) -> Result<()> {
        check.validate()?;
        let tenant = check.tenant()?;
        let key = keys::check(&tenant, &check.name)?;
        self.tenants
            .put_scoped(ctx, &tenant, &key, encode(check)?)
            .await?;

        debug!("Updated check {} in {}", check.name, tenant);
        Ok(())
    }

    pub async fn delete_check_config_by_name(&self, ctx: &RequestContext, name: &str) -> Result<()> {
        let key = keys::check(ctx.tenant(), name)?;
        ctx.run(self.kv.delete(&key)).await?;
        Ok(())
    }
}
