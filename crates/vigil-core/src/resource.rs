//! Resource capability trait used by authorization
//!
//! Every resource variant reports its kind and the tenant it belongs to.
//! Authorization dispatches on the kind through an explicit table instead of
//! inspecting concrete types.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::TenantKey;

/// Kinds of resources visible through the query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Entity,
    Check,
    Event,
    User,
}

impl ResourceKind {
    /// Resource type name used by authorization rules.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Entity => "entities",
            ResourceKind::Check => "checks",
            ResourceKind::Event => "events",
            ResourceKind::User => "users",
        }
    }

    /// Users are cluster-wide; everything else lives inside a tenant.
    pub fn is_tenant_scoped(&self) -> bool {
        !matches!(self, ResourceKind::User)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities authorization needs from a resource.
pub trait Resource {
    fn kind(&self) -> ResourceKind;

    /// Tenant owning this resource.
    ///
    /// `None` for a tenant-scoped kind means the record is malformed and
    /// cannot be evaluated.
    fn tenant_key(&self) -> Option<TenantKey>;

    fn name(&self) -> Cow<'_, str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ResourceKind::Entity.as_str(), "entities");
        assert_eq!(ResourceKind::Check.as_str(), "checks");
        assert_eq!(ResourceKind::Event.as_str(), "events");
        assert_eq!(ResourceKind::User.to_string(), "users");
    }

    #[test]
    fn test_tenant_scoping() {
        assert!(ResourceKind::Entity.is_tenant_scoped());
        assert!(ResourceKind::Event.is_tenant_scoped());
        assert!(!ResourceKind::User.is_tenant_scoped());
    }
}
