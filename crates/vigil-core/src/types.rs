//! Resource records stored per tenant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::{
    Resource, ResourceKind, Result, TenantKey,
    tenant::validate_segment,
};

/// A monitored entity (agent, proxy, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub organization: String,
    pub environment: String,

    #[serde(default)]
    pub class: String,

    #[serde(default)]
    pub subscriptions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

impl Entity {
    pub fn validate(&self) -> Result<()> {
        validate_segment("entity name", &self.name)?;
        self.tenant().map(|_| ())
    }

    pub fn tenant(&self) -> Result<TenantKey> {
        TenantKey::new(self.organization.clone(), self.environment.clone())
    }
}

/// Check definition as configured in a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    pub name: String,
    pub organization: String,
    pub environment: String,
    pub command: String,

    /// Scheduling interval in seconds
    pub interval: u32,

    #[serde(default)]
    pub subscriptions: Vec<String>,

    #[serde(default)]
    pub publish: bool,
}

impl CheckConfig {
    pub fn validate(&self) -> Result<()> {
        validate_segment("check name", &self.name)?;
        self.tenant().map(|_| ())
    }

    pub fn tenant(&self) -> Result<TenantKey> {
        TenantKey::new(self.organization.clone(), self.environment.clone())
    }
}

/// Outcome of one check execution on one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub command: String,
    pub status: u32,

    #[serde(default)]
    pub output: String,

    pub executed: DateTime<Utc>,

    /// Execution time in seconds
    #[serde(default)]
    pub duration: f64,
}

/// Latest recorded outcome for one (entity, check) pair.
///
/// The tenant is the entity's organization and environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub entity: Entity,
    pub check: CheckResult,
}

impl Event {
    /// Ensure every component of the identity key is present and usable.
    pub fn validate(&self) -> Result<()> {
        self.entity.validate()?;
        validate_segment("check name", &self.check.name)
    }

    pub fn tenant(&self) -> Result<TenantKey> {
        self.entity.tenant()
    }

    pub fn entity_name(&self) -> &str {
        &self.entity.name
    }

    pub fn check_name(&self) -> &str {
        &self.check.name
    }

    /// Check outcome is anything other than OK.
    pub fn is_incident(&self) -> bool {
        self.check.status != 0
    }
}

/// A user account. Users are cluster-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default)]
    pub disabled: bool,
}

impl User {
    pub fn validate(&self) -> Result<()> {
        validate_segment("username", &self.username)
    }
}

impl Resource for Entity {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Entity
    }

    fn tenant_key(&self) -> Option<TenantKey> {
        self.tenant().ok()
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

impl Resource for CheckConfig {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Check
    }

    fn tenant_key(&self) -> Option<TenantKey> {
        self.tenant().ok()
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

impl Resource for Event {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Event
    }

    fn tenant_key(&self) -> Option<TenantKey> {
        self.tenant().ok()
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{}/{}", self.entity.name, self.check.name))
    }
}

impl Resource for User {
    fn kind(&self) -> ResourceKind {
        ResourceKind::User
    }

    fn tenant_key(&self) -> Option<TenantKey> {
        None
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.username)
    }
}
