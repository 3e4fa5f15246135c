//! User storage
//!
//! Users are cluster-wide and not scoped to a tenant.

use std::sync::Arc;
use tracing::debug;

use vigil_core::{KvStore, RequestContext, Result, User};

use crate::codec::{decode, decode_listing, encode};
use crate::keys;

pub struct UserStore {
    kv: Arc<dyn KvStore>,
}

impl UserStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// The user named `username`, or `None` if there is no such user.
    pub async fn get_user(&self, ctx: &RequestContext, username: &str) -> Result<Option<User>> {
        let key = keys::user(username)?;
        match ctx.run(self.kv.get(&key)).await? {
            Some(bytes) => decode(&key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    pub async fn get_users(&self, ctx: &RequestContext) -> Result<Vec<User>> {
        let pairs = ctx.run(self.kv.list_prefix(&keys::users_prefix())).await?;
        Ok(decode_listing(pairs))
    }

    pub async fn update_user(&self, ctx: &RequestContext, user: &User) -> Result<()> {
        user.validate()?;
        let key = keys::user(&user.username)?;
        ctx.run(self.kv.put(&key, encode(user)?)).await?;

        debug!("Updated user {}", user.username);
        Ok(())
    }

    pub async fn delete_user(&self, ctx: &RequestContext, username: &str) -> Result<()> {
        let key = keys::user(username)?;
        ctx.run(self.kv.delete(&key)).await?;
        Ok(())
    }
}
