//! Viewer resolution: authorization, ordering and pagination together

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;

use vigil_auth::{Ability, AbilityTable, Authorizer, RuleAbility};
use vigil_core::fixtures::{
    fixture_actor_admin, fixture_check_config, fixture_entity, fixture_event, fixture_user,
};
use vigil_core::{
    Actor, CheckConfig, Error, KvPair, KvStore, Permission, RequestContext, Resource,
    ResourceKind, Result, Rule,
};
use vigil_query::{CheckQuery, CheckQueryParams, ConnectionArgs, Viewer, encode_cursor};
use vigil_storage::{MemoryKvStore, Store};

mock! {
    pub Kv {}

    #[async_trait]
    impl KvStore for Kv {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
        async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
        async fn put_if_exists(&self, guard_key: &str, key: &str, value: Vec<u8>) -> Result<bool>;
        async fn delete(&self, key: &str) -> Result<bool>;
        async fn list_prefix(&self, prefix: &str) -> Result<Vec<KvPair>>;
    }
}

mock! {
    pub Checks {}

    #[async_trait]
    impl CheckQuery for Checks {
        async fn query(
            &self,
            ctx: &RequestContext,
            params: &CheckQueryParams,
        ) -> Result<Vec<CheckConfig>>;
    }
}

/// Hides every resource whose name starts with "hidden".
struct HidePrefixed;

impl Ability for HidePrefixed {
    fn can(&self, _actor: &Actor, _permission: Permission, resource: &dyn Resource) -> bool {
        !resource.name().starts_with("hidden")
    }
}

fn admin_context() -> RequestContext {
    RequestContext::from_parts("default", "default", fixture_actor_admin("admin")).unwrap()
}

fn hiding_authorizer() -> Arc<Authorizer> {
    let table = AbilityTable::default()
        .with(ResourceKind::Entity, Arc::new(HidePrefixed))
        .with(ResourceKind::Event, Arc::new(HidePrefixed));
    Arc::new(Authorizer::new(table))
}

async fn seeded_store(ctx: &RequestContext) -> Store {
    let store = Store::new(Arc::new(MemoryKvStore::new()));
    store.tenants().ensure_tenant(ctx, ctx.tenant()).await.unwrap();

    for (entity, check) in [
        ("b", "check1"),
        ("hidden-1", "check1"),
        ("a", "check2"),
        ("hidden-2", "check1"),
        ("a", "check1"),
    ] {
        store
            .events()
            .update_event(ctx, &fixture_event(entity, check))
            .await
            .unwrap();
    }
    for name in ["web", "hidden-db", "api"] {
        store
            .entities()
            .update_entity(ctx, &fixture_entity(name))
            .await
            .unwrap();
    }
    store
}

fn event_ids(page: &vigil_query::Connection<vigil_core::Event>) -> Vec<String> {
    page.nodes().map(|event| event.name().into_owned()).collect()
}

#[tokio::test]
async fn test_check_events_filtered_and_sorted() {
    let ctx = admin_context();
    let viewer = Viewer::new(seeded_store(&ctx).await, hiding_authorizer());

    let page = viewer
        .check_events(&ctx, &ConnectionArgs::new())
        .await
        .unwrap();

    assert_eq!(event_ids(&page), vec!["a/check1", "a/check2", "b/check1"]);
    assert_eq!(page.total_count, 3);
    assert!(!page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
}

#[tokio::test]
async fn test_page_flags_use_filtered_set() {
    let ctx = admin_context();
    let viewer = Viewer::new(seeded_store(&ctx).await, hiding_authorizer());

    for k in 0..6 {
        let page = viewer
            .check_events(&ctx, &ConnectionArgs::new().with_first(k))
            .await
            .unwrap();
        assert_eq!(page.edges.len(), k.min(3), "first: {}", k);
        assert_eq!(page.page_info.has_next_page, k < 3, "first: {}", k);
    }
}

#[tokio::test]
async fn test_hidden_resources_never_paged() {
    let ctx = admin_context();
    let viewer = Viewer::new(seeded_store(&ctx).await, hiding_authorizer());

    for after in 0..3 {
        for first in 0..4 {
            let args = ConnectionArgs::new()
                .with_after(encode_cursor(after))
                .with_first(first);
            let page = viewer.check_events(&ctx, &args).await.unwrap();
            assert!(
                page.nodes().all(|event| !event.entity_name().starts_with("hidden")),
                "after {} first {}",
                after,
                first
            );
        }
    }
}

#[tokio::test]
async fn test_repeated_calls_yield_same_cursors() {
    let ctx = admin_context();
    let viewer = Viewer::new(seeded_store(&ctx).await, hiding_authorizer());
    let args = ConnectionArgs::new().with_first(2);

    let first = viewer.check_events(&ctx, &args).await.unwrap();
    let second = viewer.check_events(&ctx, &args).await.unwrap();
    assert_eq!(first, second);

    let next = viewer
        .check_events(
            &ctx,
            &ConnectionArgs::new().with_after(first.page_info.end_cursor.clone().unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(event_ids(&next), vec!["b/check1"]);
}

#[tokio::test]
async fn test_entities_sorted_by_name() {
    let ctx = admin_context();
    let viewer = Viewer::new(seeded_store(&ctx).await, hiding_authorizer());

    let page = viewer.entities(&ctx, &ConnectionArgs::new()).await.unwrap();
    let names: Vec<&str> = page.nodes().map(|entity| entity.name.as_str()).collect();
    assert_eq!(names, vec!["api", "web"]);
}

#[tokio::test]
async fn test_actor_without_rules_gets_empty_page() {
    let admin = admin_context();
    let store = seeded_store(&admin).await;
    let viewer = Viewer::new(store, Arc::new(Authorizer::default()));

    let ctx = RequestContext::from_parts("default", "default", Actor::anonymous("guest")).unwrap();
    let page = viewer
        .check_events(&ctx, &ConnectionArgs::new().with_first(10))
        .await
        .unwrap();

    assert!(page.edges.is_empty());
    assert!(!page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
}

#[tokio::test]
async fn test_invalid_cursor_rejected() {
    let ctx = admin_context();
    let viewer = Viewer::new(seeded_store(&ctx).await, hiding_authorizer());

    let result = viewer
        .check_events(&ctx, &ConnectionArgs::new().with_after(encode_cursor(3)))
        .await;
    assert!(matches!(result, Err(Error::InvalidCursor(_))));

    let result = viewer
        .entities(&ctx, &ConnectionArgs::new().with_before("garbage"))
        .await;
    assert!(matches!(result, Err(Error::InvalidCursor(_))));
}

#[tokio::test]
async fn test_fetch_error_propagates() {
    let mut kv = MockKv::new();
    kv.expect_list_prefix()
        .returning(|_| Err(Error::Upstream("connection refused".to_string())));
    let viewer = Viewer::new(Store::new(Arc::new(kv)), Arc::new(Authorizer::default()));
    let ctx = admin_context();

    let events = viewer.check_events(&ctx, &ConnectionArgs::new()).await;
    assert!(matches!(events, Err(Error::Upstream(_))));

    let entities = viewer.entities(&ctx, &ConnectionArgs::new()).await;
    assert!(matches!(entities, Err(Error::Upstream(_))));

    let checks = viewer.checks(&ctx, &ConnectionArgs::new()).await;
    assert!(matches!(checks, Err(Error::Upstream(_))));
}

#[tokio::test]
async fn test_checks_from_query_not_refiltered() {
    let mut checks = MockChecks::new();
    checks.expect_query().times(1).returning(|_, _| {
        let mut other = fixture_check_config("check-b");
        other.environment = "elsewhere".to_string();
        Ok(vec![other, fixture_check_config("check-a")])
    });

    let ctx = RequestContext::from_parts("default", "default", Actor::anonymous("guest")).unwrap();
    let viewer = Viewer::new(
        Store::new(Arc::new(MemoryKvStore::new())),
        Arc::new(Authorizer::default()),
    )
    .with_check_query(Arc::new(checks));

    let page = viewer.checks(&ctx, &ConnectionArgs::new()).await.unwrap();
    let names: Vec<&str> = page.nodes().map(|check| check.name.as_str()).collect();
    assert_eq!(names, vec!["check-a", "check-b"]);
}

#[tokio::test]
async fn test_checks_through_controller() {
    let ctx = admin_context();
    let store = seeded_store(&ctx).await;
    for name in ["check-z", "check-m"] {
        store
            .checks()
            .update_check_config(&ctx, &fixture_check_config(name))
            .await
            .unwrap();
    }
    let viewer = Viewer::new(store, Arc::new(Authorizer::default()));

    let page = viewer
        .checks(&ctx, &ConnectionArgs::new().with_last(1))
        .await
        .unwrap();
    let names: Vec<&str> = page.nodes().map(|check| check.name.as_str()).collect();
    assert_eq!(names, vec!["check-z"]);
    assert!(page.page_info.has_previous_page);
}

#[tokio::test]
async fn test_user_resolves_own_record() {
    let store = Store::new(Arc::new(MemoryKvStore::new()));
    let ctx = RequestContext::from_parts("default", "default", Actor::anonymous("alice")).unwrap();
    let viewer = Viewer::new(store.clone(), Arc::new(Authorizer::default()));

    assert_eq!(viewer.user(&ctx).await.unwrap(), None);

    store.users().update_user(&ctx, &fixture_user("alice")).await.unwrap();
    store.users().update_user(&ctx, &fixture_user("bob")).await.unwrap();

    let user = viewer.user(&ctx).await.unwrap().unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn test_event_admission() {
    let admin = admin_context();
    let store = seeded_store(&admin).await;
    let table = AbilityTable::default().with(ResourceKind::Event, Arc::new(RuleAbility));
    let viewer = Viewer::new(store, Arc::new(Authorizer::new(table)));

    let found = viewer.event(&admin, "a", "check1").await.unwrap();
    assert!(found.is_some());

    let entity_reader = Actor::new(
        "reader",
        vec![Rule::new("default", "default", "entities", vec![Permission::Read])],
    );
    let ctx = RequestContext::from_parts("default", "default", entity_reader).unwrap();

    let denied = viewer.event(&ctx, "a", "check1").await;
    assert!(matches!(denied, Err(Error::Unauthorized(_))));

    let absent = viewer.event(&ctx, "nope", "nope").await.unwrap();
    assert!(absent.is_none());

    let invalid = viewer.event(&ctx, "", "check1").await;
    assert!(matches!(invalid, Err(Error::InvalidArgument(_))));
}
