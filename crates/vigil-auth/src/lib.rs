//! Vigil Authorization
//!
//! Read authorization for resources fetched by the query layer:
//! - `Ability`: permission predicate for one resource kind
//! - `AbilityTable`: explicit mapping from resource kind to its ability
//! - `Authorizer`: per-item checks and post-fetch filtering

pub mod ability;
pub mod authorizer;

pub use ability::{Ability, AbilityTable, RuleAbility, UserAbility};
pub use authorizer::Authorizer;
pub use vigil_core::Permission;
