//! Vigil Storage
//!
//! Tenant-scoped resource storage on top of a consistent key-value store:
//! - Key-value backends (in-memory and SQLite)
//! - Tenant registry used to validate writes
//! - Event, entity, check and user stores
//! - Storage configuration

mod codec;
pub mod checks;
pub mod config;
pub mod entities;
pub mod events;
pub mod keys;
pub mod memory;
pub mod sqlite;
pub mod store;
pub mod tenants;
pub mod users;

pub use checks::CheckConfigStore;
pub use config::{StoreBackend, StoreConfig};
pub use entities::EntityStore;
pub use events::EventStore;
pub use memory::MemoryKvStore;
pub use sqlite::{SqliteKvConfig, SqliteKvStore};
pub use store::Store;
pub use tenants::{Environment, Organization, TenantStore};
pub use users::UserStore;
