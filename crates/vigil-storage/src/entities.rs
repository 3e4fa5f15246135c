//! Entity storage

use std::sync::Arc;
use tracing::debug;

use vigil_core::{Entity, KvStore, RequestContext, Result};

use crate::codec::{decode, decode_listing, encode};
use crate::keys;
use crate::tenants::TenantStore;

pub struct EntityStore {
    kv: Arc<dyn KvStore>,
    tenants: Arc<TenantStore>,
}

impl EntityStore {
    pub fn new(kv: Arc<dyn KvStore>, tenants: Arc<TenantStore>) -> Self {
        Self { kv, tenants }
    }

    pub async fn get_entities(&self, ctx: &RequestContext) -> Result<Vec<Entity>> {
        let prefix = keys::entities_prefix(ctx.tenant());
        let pairs = ctx.run(self.kv.list_prefix(&prefix)).await?;
        Ok(decode_listing(pairs))
    }

    pub async fn get_entity_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<Option<Entity>> {
        let key = keys::entity(ctx.tenant(), name)?;
        match ctx.run(self.kv.get(&key)).await? {
            Some(bytes) => decode(&key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Create or replace an entity in its own tenant, which must exist.
    pub async fn update_entity(&self, ctx: &RequestContext, entity: &Entity) -> Result<()> {
        entity.validate()?;
        let tenant = entity.tenant()?;
        let key = keys::entity(&tenant, &entity.name)?;
        self.tenants
            .put_scoped(ctx, &tenant, &key, encode(entity)?)
            .await?;

        debug!("Updated entity {} in {}", entity.name, tenant);
        Ok(())
    }

    pub async fn delete_entity_by_name(&self, ctx: &RequestContext, name: &str) -> Result<()> {
        let key = keys::entity(ctx.tenant(), name)?;
        ctx.run(self.kv.delete(&key)).await?;
        Ok(())
    }
}
