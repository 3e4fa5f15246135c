//! Key layout in the backing store
//!
//! ```text
//! /vigil.io/organizations/<org>
//! /vigil.io/environments/<org>/<env>
//! /vigil.io/entities/<org>/<env>/<entity>
//! /vigil.io/checks/<org>/<env>/<check>
//! /vigil.io/events/<org>/<env>/<entity>/<check>
//! /vigil.io/users/<username>
//! ```
//!
//! Collection prefixes end with a separator so that listing `entity1` never
//! returns records of `entity10`.

use vigil_core::{Result, TenantKey, tenant::validate_segment};

pub const ROOT: &str = "/vigil.io";

fn tenant_prefix(collection: &str, tenant: &TenantKey) -> String {
    format!(
        "{}/{}/{}/{}/",
        ROOT,
        collection,
        tenant.organization(),
        tenant.environment()
    )
}

pub fn organization(name: &str) -> Result<String> {
    validate_segment("organization", name)?;
    Ok(format!("{}/organizations/{}", ROOT, name))
}

pub fn organizations_prefix() -> String {
    format!("{}/organizations/", ROOT)
}

/// Existence of this key is what makes a tenant real.
pub fn environment(tenant: &TenantKey) -> String {
    format!(
        "{}/environments/{}/{}",
        ROOT,
        tenant.organization(),
        tenant.environment()
    )
}

pub fn environments_prefix(organization: &str) -> Result<String> {
    validate_segment("organization", organization)?;
    Ok(format!("{}/environments/{}/", ROOT, organization))
}

pub fn entities_prefix(tenant: &TenantKey) -> String {
    tenant_prefix("entities", tenant)
}

pub fn entity(tenant: &TenantKey, name: &str) -> Result<String> {
    validate_segment("entity name", name)?;
    Ok(format!("{}{}", entities_prefix(tenant), name))
}

pub fn checks_prefix(tenant: &TenantKey) -> String {
    tenant_prefix("checks", tenant)
}

pub fn check(tenant: &TenantKey, name: &str) -> Result<String> {
    validate_segment("check name", name)?;
    Ok(format!("{}{}", checks_prefix(tenant), name))
}

pub fn events_prefix(tenant: &TenantKey) -> String {
    tenant_prefix("events", tenant)
}

pub fn entity_events_prefix(tenant: &TenantKey, entity: &str) -> Result<String> {
    validate_segment("entity name", entity)?;
    Ok(format!("{}{}/", events_prefix(tenant), entity))
}

pub fn event(tenant: &TenantKey, entity: &str, check: &str) -> Result<String> {
    let prefix = entity_events_prefix(tenant, entity)?;
    validate_segment("check name", check)?;
    Ok(format!("{}{}", prefix, check))
}

pub fn users_prefix() -> String {
    format!("{}/users/", ROOT)
}

pub fn user(username: &str) -> Result<String> {
    validate_segment("username", username)?;
    Ok(format!("{}{}", users_prefix(), username))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantKey {
        TenantKey::new("org1", "env1").unwrap()
    }

    #[test]
    fn test_event_key() {
        assert_eq!(
            event(&tenant(), "entity1", "check1").unwrap(),
            "/vigil.io/events/org1/env1/entity1/check1"
        );
    }

    #[test]
    fn test_event_key_requires_both_names() {
        assert!(event(&tenant(), "", "check1").unwrap_err().is_invalid_argument());
        assert!(event(&tenant(), "entity1", "").unwrap_err().is_invalid_argument());
        assert!(event(&tenant(), "", "").is_err());
    }

    #[test]
    fn test_malformed_segments_rejected() {
        assert!(event(&tenant(), "a/b", "check1").is_err());
        assert!(entity(&tenant(), "a/b").is_err());
        assert!(user("x/y").is_err());
    }

    #[test]
    fn test_entity_prefix_does_not_match_longer_names() {
        let prefix = entity_events_prefix(&tenant(), "entity1").unwrap();
        let other = event(&tenant(), "entity10", "check1").unwrap();
        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn test_tenant_collections_are_isolated() {
        let other = TenantKey::new("org1", "env10").unwrap();
        assert!(!events_prefix(&other).starts_with(&events_prefix(&tenant())));
        assert!(!event(&other, "e", "c").unwrap().starts_with(&events_prefix(&tenant())));
    }

    #[test]
    fn test_environment_key() {
        assert_eq!(environment(&tenant()), "/vigil.io/environments/org1/env1");
        assert!(environment(&tenant()).starts_with(&environments_prefix("org1").unwrap()));
    }
}
