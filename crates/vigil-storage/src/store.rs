//! Store aggregate
//!
//! Wires every resource store to one shared key-value client and one shared
//! tenant registry.

use std::sync::Arc;
use tracing::info;

use vigil_core::{KvStore, Result};

use crate::checks::CheckConfigStore;
use crate::config::{StoreBackend, StoreConfig};
use crate::entities::EntityStore;
use crate::events::EventStore;
use crate::memory::MemoryKvStore;
use crate::sqlite::SqliteKvStore;
use crate::tenants::TenantStore;
use crate::users::UserStore;

/// All resource stores over one backing key-value store
#[derive(Clone)]
pub struct Store {
    kv: Arc<dyn KvStore>,
    tenants: Arc<TenantStore>,
    events: Arc<EventStore>,
    entities: Arc<EntityStore>,
    checks: Arc<CheckConfigStore>,
    users: Arc<UserStore>,
}

impl Store {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        let tenants = Arc::new(TenantStore::new(kv.clone()));
        Self {
            events: Arc::new(EventStore::new(kv.clone(), tenants.clone())),
            entities: Arc::new(EntityStore::new(kv.clone(), tenants.clone())),
            checks: Arc::new(CheckConfigStore::new(kv.clone(), tenants.clone())),
            users: Arc::new(UserStore::new(kv.clone())),
            tenants,
            kv,
        }
    }

    /// Open the backend selected by `config`.
    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        let kv: Arc<dyn KvStore> = match config.backend {
            StoreBackend::Memory => Arc::new(MemoryKvStore::new()),
            StoreBackend::Sqlite => Arc::new(SqliteKvStore::new(&config.sqlite).await?),
        };

        info!("Initialized store with {:?} backend", config.backend);
        Ok(Self::new(kv))
    }

    pub fn kv(&self) -> &Arc<dyn KvStore> {
        &self.kv
    }

    pub fn tenants(&self) -> &TenantStore {
        &self.tenants
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn checks(&self) -> &CheckConfigStore {
        &self.checks
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }
}
