//! Vigil Core Types and Traits
//!
//! This crate provides the fundamental types and traits shared by every
//! Vigil crate:
//! - Tenant identity and the per-request context
//! - Actors and their authorization rules
//! - The resource model (entities, checks, events, users)
//! - The key-value store client abstraction
//! - Core error types

pub mod actor;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod kv;
pub mod resource;
pub mod tenant;
pub mod types;

pub use actor::{Actor, ActorProvider, Permission, Rule, StaticActorProvider};
pub use context::{CancelHandle, RequestContext};
pub use error::{Error, Result};
pub use kv::{KvPair, KvStore};
pub use resource::{Resource, ResourceKind};
pub use tenant::TenantKey;
pub use types::{CheckConfig, CheckResult, Entity, Event, User};
