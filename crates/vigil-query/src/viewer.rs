//! Viewer: paginated, authorized resource collections for the current actor

use std::sync::Arc;

use tracing::debug;

use vigil_auth::Authorizer;
use vigil_core::{CheckConfig, Entity, Event, Permission, RequestContext, Result, User};
use vigil_storage::Store;

use crate::controller::{CheckController, CheckQuery, CheckQueryParams};
use crate::pagination::{Connection, ConnectionArgs, connection_from_vec};

/// Resolves the collections visible to the actor of a request.
///
/// Each collection is fetched in full, filtered to what the actor may read,
/// sorted by identity and then paged. Fetch errors abort the whole
/// resolution.
pub struct Viewer {
    store: Store,
    authorizer: Arc<Authorizer>,
    checks: Arc<dyn CheckQuery>,
}

impl Viewer {
    pub fn new(store: Store, authorizer: Arc<Authorizer>) -> Self {
        let checks = Arc::new(CheckController::new(store.clone(), authorizer.clone()));
        Self {
            store,
            authorizer,
            checks,
        }
    }

    /// Replace the check source.
    pub fn with_check_query(mut self, checks: Arc<dyn CheckQuery>) -> Self {
        self.checks = checks;
        self
    }

    pub async fn entities(
        &self,
        ctx: &RequestContext,
        args: &ConnectionArgs,
    ) -> Result<Connection<Entity>> {
        debug!(tenant = %ctx.tenant(), actor = %ctx.actor().name, "Resolving viewer entities");

        let entities = self.store.entities().get_entities(ctx).await?;
        let mut entities = self.authorizer.filter_readable(ctx.actor(), entities);
        entities.sort_by(|a, b| a.name.cmp(&b.name));
        connection_from_vec(entities, args)
    }

    /// Checks come from the check source already authorized.
    pub async fn checks(
        &self,
        ctx: &RequestContext,
        args: &ConnectionArgs,
    ) -> Result<Connection<CheckConfig>> {
        debug!(tenant = %ctx.tenant(), actor = %ctx.actor().name, "Resolving viewer checks");

        let mut checks = self.checks.query(ctx, &CheckQueryParams::default()).await?;
        checks.sort_by(|a, b| a.name.cmp(&b.name));
        connection_from_vec(checks, args)
    }

    pub async fn check_events(
        &self,
        ctx: &RequestContext,
        args: &ConnectionArgs,
    ) -> Result<Connection<Event>> {
        debug!(tenant = %ctx.tenant(), actor = %ctx.actor().name, "Resolving viewer check events");

        let events = self.store.events().get_events(ctx).await?;
        let mut events = self.authorizer.filter_readable(ctx.actor(), events);
        events.sort_by(|a, b| {
            (a.entity_name(), a.check_name()).cmp(&(b.entity_name(), b.check_name()))
        });
        connection_from_vec(events, args)
    }

    /// The actor's own user record, if one is stored.
    pub async fn user(&self, ctx: &RequestContext) -> Result<Option<User>> {
        debug!(actor = %ctx.actor().name, "Resolving viewer user");
        self.store.users().get_user(ctx, &ctx.actor().name).await
    }

    /// Look up one event, rejecting the request when the actor may not read it.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if either name is empty
    /// - `Error::Unauthorized` if the event exists but is not readable
    pub async fn event(
        &self,
        ctx: &RequestContext,
        entity_name: &str,
        check_name: &str,
    ) -> Result<Option<Event>> {
        debug!(
            tenant = %ctx.tenant(),
            actor = %ctx.actor().name,
            entity = entity_name,
            check = check_name,
            "Resolving event"
        );

        let event = self
            .store
            .events()
            .get_event_by_entity_check(ctx, entity_name, check_name)
            .await?;
        if let Some(event) = &event {
            self.authorizer
                .authorize(ctx.actor(), Permission::Read, event)?;
        }
        Ok(event)
    }
}
