//! Check controller: check configurations scoped to what the actor may read

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use vigil_auth::Authorizer;
use vigil_core::{CheckConfig, RequestContext, Result};
use vigil_storage::Store;

/// Filters applied when querying checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckQueryParams {
    /// Only checks published to this subscription
    pub subscription: Option<String>,
}

impl CheckQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscription(mut self, subscription: impl Into<String>) -> Self {
        self.subscription = Some(subscription.into());
        self
    }
}

/// Source of check configurations for the query layer.
///
/// Implementations apply authorization themselves; results are returned to
/// the actor as-is.
#[async_trait]
pub trait CheckQuery: Send + Sync {
    async fn query(
        &self,
        ctx: &RequestContext,
        params: &CheckQueryParams,
    ) -> Result<Vec<CheckConfig>>;
}

pub struct CheckController {
    store: Store,
    authorizer: Arc<Authorizer>,
}

impl CheckController {
    pub fn new(store: Store, authorizer: Arc<Authorizer>) -> Self {
        Self { store, authorizer }
    }
}

#[async_trait]
impl CheckQuery for CheckController {
    async fn query(
        &self,
        ctx: &RequestContext,
        params: &CheckQueryParams,
    ) -> Result<Vec<CheckConfig>> {
        let mut checks = self.store.checks().get_check_configs(ctx).await?;
        if let Some(subscription) = &params.subscription {
            checks.retain(|check| check.subscriptions.contains(subscription));
        }
        debug!(
            tenant = %ctx.tenant(),
            fetched = checks.len(),
            "Queried check configurations"
        );
        Ok(self.authorizer.filter_readable(ctx.actor(), checks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::fixtures::{fixture_actor_admin, fixture_check_config};
    use vigil_core::{Actor, Permission, Rule};
    use vigil_storage::MemoryKvStore;

    async fn seeded_store(ctx: &RequestContext) -> Store {
        let store = Store::new(Arc::new(MemoryKvStore::new()));
        store.tenants().ensure_tenant(ctx, ctx.tenant()).await.unwrap();

        let mut linux = fixture_check_config("check-disk");
        linux.subscriptions = vec!["linux".to_string()];
        store.checks().update_check_config(ctx, &linux).await.unwrap();

        let mut windows = fixture_check_config("check-cpu");
        windows.subscriptions = vec!["windows".to_string()];
        store.checks().update_check_config(ctx, &windows).await.unwrap();

        store
    }

    #[tokio::test]
    async fn test_query_filters_by_subscription() {
        let ctx = RequestContext::from_parts("default", "default", fixture_actor_admin("admin"))
            .unwrap();
        let controller =
            CheckController::new(seeded_store(&ctx).await, Arc::new(Authorizer::default()));

        let all = controller.query(&ctx, &CheckQueryParams::new()).await.unwrap();
        assert_eq!(all.len(), 2);

        let linux = controller
            .query(&ctx, &CheckQueryParams::new().with_subscription("linux"))
            .await
            .unwrap();
        assert_eq!(linux.len(), 1);
        assert_eq!(linux[0].name, "check-disk");
    }

    #[tokio::test]
    async fn test_query_applies_authorization() {
        let admin = RequestContext::from_parts("default", "default", fixture_actor_admin("admin"))
            .unwrap();
        let store = seeded_store(&admin).await;
        let controller = CheckController::new(store, Arc::new(Authorizer::default()));

        let entity_reader = Actor::new(
            "reader",
            vec![Rule::new("*", "*", "entities", vec![Permission::Read])],
        );
        let ctx = RequestContext::from_parts("default", "default", entity_reader).unwrap();

        let checks = controller.query(&ctx, &CheckQueryParams::new()).await.unwrap();
        assert!(checks.is_empty());
    }
}
