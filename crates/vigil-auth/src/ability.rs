//! Abilities: per-kind permission predicates

use std::collections::HashMap;
use std::sync::Arc;

use vigil_core::actor::WILDCARD;
use vigil_core::{Actor, Permission, Resource, ResourceKind, Rule, TenantKey};

/// Decides whether an actor may perform an operation on one resource.
///
/// Implementations must treat a resource they cannot evaluate as denied.
pub trait Ability: Send + Sync {
    fn can(&self, actor: &Actor, permission: Permission, resource: &dyn Resource) -> bool;
}

/// Grants access when one of the actor's rules covers the resource's type,
/// tenant and the requested permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAbility;

impl Ability for RuleAbility {
    fn can(&self, actor: &Actor, permission: Permission, resource: &dyn Resource) -> bool {
        let kind = resource.kind();
        let tenant = match (kind.is_tenant_scoped(), resource.tenant_key()) {
            (true, None) => return false,
            (true, tenant) => tenant,
            (false, _) => None,
        };

        actor
            .rules
            .iter()
            .any(|rule| rule_covers(rule, kind, tenant.as_ref(), permission))
    }
}

/// Rule-based access, plus every actor may read its own user record.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAbility;

impl Ability for UserAbility {
    fn can(&self, actor: &Actor, permission: Permission, resource: &dyn Resource) -> bool {
        if permission == Permission::Read && resource.name() == actor.name.as_str() {
            return true;
        }
        RuleAbility.can(actor, permission, resource)
    }
}

fn rule_covers(
    rule: &Rule,
    kind: ResourceKind,
    tenant: Option<&TenantKey>,
    permission: Permission,
) -> bool {
    if !rule.grants(permission) || !pattern_matches(&rule.resource_type, kind.as_str()) {
        return false;
    }
    match tenant {
        Some(tenant) => {
            pattern_matches(&rule.organization, tenant.organization())
                && pattern_matches(&rule.environment, tenant.environment())
        }
        None => true,
    }
}

fn pattern_matches(pattern: &str, value: &str) -> bool {
    pattern == WILDCARD || pattern == value
}

/// Explicit mapping from resource kind to the ability governing it.
///
/// A kind without an entry is never accessible.
#[derive(Clone)]
pub struct AbilityTable {
    abilities: HashMap<ResourceKind, Arc<dyn Ability>>,
}

impl AbilityTable {
    pub fn empty() -> Self {
        Self {
            abilities: HashMap::new(),
        }
    }

    pub fn with(mut self, kind: ResourceKind, ability: Arc<dyn Ability>) -> Self {
        self.abilities.insert(kind, ability);
        self
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&Arc<dyn Ability>> {
        self.abilities.get(&kind)
    }
}

impl Default for AbilityTable {
    fn default() -> Self {
        Self::empty()
            .with(ResourceKind::Entity, Arc::new(RuleAbility))
            .with(ResourceKind::Check, Arc::new(RuleAbility))
            .with(ResourceKind::Event, Arc::new(RuleAbility))
            .with(ResourceKind::User, Arc::new(UserAbility))
    }
}
