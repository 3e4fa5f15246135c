//! Event storage
//!
//! One event per (organization, environment, entity, check). Writes are
//! upserts validated against the tenant registry; deletes are immediate and
//! succeed when the event is already gone.

use std::sync::Arc;
use tracing::debug;

use vigil_core::{Error, Event, KvStore, RequestContext, Result};

use crate::codec::{decode, decode_listing, encode};
use crate::keys;
use crate::tenants::TenantStore;

/// Event store
///
/// All reads are scoped to the tenant of the request context.
pub struct EventStore {
    kv: Arc<dyn KvStore>,
    tenants: Arc<TenantStore>,
}

impl EventStore {
    pub fn new(kv: Arc<dyn KvStore>, tenants: Arc<TenantStore>) -> Self {
        Self { kv, tenants }
    }

    /// All events of the request's tenant, in key order.
    ///
    /// Returns an empty vec when the tenant has no events.
    pub async fn get_events(&self, ctx: &RequestContext) -> Result<Vec<Event>> {
        let prefix = keys::events_prefix(ctx.tenant());
        let pairs = ctx.run(self.kv.list_prefix(&prefix)).await?;
        let events: Vec<Event> = decode_listing(pairs);

        debug!("Listed {} events in {}", events.len(), ctx.tenant());
        Ok(events)
    }

    /// All events recorded for one entity.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if `entity_name` is empty or malformed
    pub async fn get_events_by_entity(
        &self,
        ctx: &RequestContext,
        entity_name: &str,
    ) -> Result<Vec<Event>> {
        if entity_name.is_empty() {
            return Err(Error::InvalidArgument(
                "Must specify entity name".to_string(),
            ));
        }

        let prefix = keys::entity_events_prefix(ctx.tenant(), entity_name)?;
        let pairs = ctx.run(self.kv.list_prefix(&prefix)).await?;
        let events: Vec<Event> = decode_listing(pairs);

        debug!(
            "Listed {} events for entity {} in {}",
            events.len(),
            entity_name,
            ctx.tenant()
        );
        Ok(events)
    }

    /// The event for one (entity, check) pair, or `None` if none is recorded.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if either name is empty or malformed
    pub async fn get_event_by_entity_check(
        &self,
        ctx: &RequestContext,
        entity_name: &str,
        check_name: &str,
    ) -> Result<Option<Event>> {
        let key = event_key(ctx, entity_name, check_name)?;

        match ctx.run(self.kv.get(&key)).await? {
            Some(bytes) => decode(&key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Create or replace the event for its (entity, check) pair.
    ///
    /// The tenant is taken from the event's entity.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if the event's identity is incomplete
    /// - `Error::NotFound` if the event's tenant does not exist; nothing is written
    pub async fn update_event(&self, ctx: &RequestContext, event: &Event) -> Result<()> {
        event.validate()?;
        let tenant = event.tenant()?;
        let key = keys::event(&tenant, event.entity_name(), event.check_name())?;
        let value = encode(event)?;

        self.tenants.put_scoped(ctx, &tenant, &key, value).await?;

        debug!(
            "Updated event {}/{} in {}",
            event.entity_name(),
            event.check_name(),
            tenant
        );
        Ok(())
    }

    /// Remove the event for one (entity, check) pair.
    ///
    /// Removing an event that does not exist is not an error.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if either name is empty or malformed
    pub async fn delete_event_by_entity_check(
        &self,
        ctx: &RequestContext,
        entity_name: &str,
        check_name: &str,
    ) -> Result<()> {
        let key = event_key(ctx, entity_name, check_name)?;
        let removed = ctx.run(self.kv.delete(&key)).await?;

        debug!(
            "Deleted event {}/{} in {} (existed: {})",
            entity_name,
            check_name,
            ctx.tenant(),
            removed
        );
        Ok(())
    }
}

fn event_key(ctx: &RequestContext, entity_name: &str, check_name: &str) -> Result<String> {
    if entity_name.is_empty() || check_name.is_empty() {
        return Err(Error::InvalidArgument(
            "Must specify entity and check name".to_string(),
        ));
    }
    keys::event(ctx.tenant(), entity_name, check_name)
}
