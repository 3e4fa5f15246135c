//! Authorizer: applies the ability table to actors and resources

use tracing::debug;

use vigil_core::{Actor, Error, Permission, Resource, Result};

use crate::ability::AbilityTable;

/// Evaluates abilities for an actor.
///
/// Filtering happens after fetching: the full candidate set is retrieved and
/// items the actor cannot read are dropped. Visibility is all or nothing per
/// item.
#[derive(Clone, Default)]
pub struct Authorizer {
    table: AbilityTable,
}

impl Authorizer {
    pub fn new(table: AbilityTable) -> Self {
        Self { table }
    }

    pub fn can(&self, actor: &Actor, permission: Permission, resource: &dyn Resource) -> bool {
        self.table
            .get(resource.kind())
            .is_some_and(|ability| ability.can(actor, permission, resource))
    }

    pub fn can_read(&self, actor: &Actor, resource: &dyn Resource) -> bool {
        self.can(actor, Permission::Read, resource)
    }

    /// Keep the items `actor` may read, preserving order.
    pub fn filter_readable<T: Resource>(&self, actor: &Actor, items: Vec<T>) -> Vec<T> {
        let total = items.len();
        let readable: Vec<T> = items
            .into_iter()
            .filter(|item| self.can_read(actor, item))
            .collect();

        if readable.len() < total {
            debug!(
                "Excluded {} of {} resources not readable by {}",
                total - readable.len(),
                total,
                actor.name
            );
        }
        readable
    }

    /// Reject the operation outright when the actor lacks the permission.
    ///
    /// # Errors
    /// - `Error::Unauthorized` if the actor may not perform `permission`
    pub fn authorize(
        &self,
        actor: &Actor,
        permission: Permission,
        resource: &dyn Resource,
    ) -> Result<()> {
        if self.can(actor, permission, resource) {
            return Ok(());
        }
        Err(Error::Unauthorized(format!(
            "{} may not {:?} {} {}",
            actor.name,
            permission,
            resource.kind(),
            resource.name()
        )))
    }
}
