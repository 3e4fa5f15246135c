//! Actors and the authorization rules bound to them
//!
//! An actor is supplied per request and never persisted by the storage
//! layer. Its rules are plain data here; evaluating them against a resource
//! is the job of the `vigil-auth` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{Error, Result};

/// Wildcard accepted by the organization, environment and resource type of a rule.
pub const WILDCARD: &str = "*";

/// Operation an actor may perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Create,
    Read,
    Update,
    Delete,
}

impl Permission {
    pub fn all() -> Vec<Permission> {
        vec![
            Permission::Create,
            Permission::Read,
            Permission::Update,
            Permission::Delete,
        ]
    }
}

/// A single grant: permissions on one resource type within one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub organization: String,
    pub environment: String,
    pub resource_type: String,
    pub permissions: Vec<Permission>,
}

impl Rule {
    pub fn new(
        organization: impl Into<String>,
        environment: impl Into<String>,
        resource_type: impl Into<String>,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            organization: organization.into(),
            environment: environment.into(),
            resource_type: resource_type.into(),
            permissions,
        }
    }

    /// Rule granting every permission on everything.
    pub fn superuser() -> Self {
        Self::new(WILDCARD, WILDCARD, WILDCARD, Permission::all())
    }

    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// The authenticated identity issuing a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Actor {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// An actor with no rules. It can read nothing but its own user record.
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

/// Resolves actors from the identity provider.
///
/// Called once at the request boundary; the resolved actor is then carried
/// in the `RequestContext`.
///
/// # Errors
/// - `Error::Unauthorized` if the name does not resolve to a known actor
/// - `Error::Upstream` if the identity provider is unreachable
#[async_trait]
pub trait ActorProvider: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<Actor>;
}

/// In-memory identity provider.
#[derive(Debug, Default)]
pub struct StaticActorProvider {
    actors: RwLock<HashMap<String, Actor>>,
}

impl StaticActorProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, actor: Actor) {
        self.actors.write().await.insert(actor.name.clone(), actor);
    }
}

#[async_trait]
impl ActorProvider for StaticActorProvider {
    async fn resolve(&self, name: &str) -> Result<Actor> {
        self.actors
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Unauthorized(format!("Unknown actor: {}", name)))
    }
}
