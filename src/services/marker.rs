//! The logged-in marker: a JSON snapshot of the signed-in user.

use crate::errors::AppResult;
use crate::models::User;
use super::kv_store::KeyValueStore;

/// The two places one client's marker can live. `durable` must already be
/// scoped to that client.
#[derive(Clone, Copy)]
pub struct MarkerStores<'a> {
    pub durable: &'a dyn KeyValueStore,
    pub session: &'a dyn KeyValueStore,
}

impl<'a> MarkerStores<'a> {
    pub fn pick(self, remember: bool) -> &'a dyn KeyValueStore {
        if remember { self.durable } else { self.session }
    }
}

pub async fn write(store: &dyn KeyValueStore, key: &str, user: Option<&User>) -> AppResult<()> {
    let raw = serde_json::to_string(&user)?;
    store.set(key, &raw).await
}

async fn read(store: &dyn KeyValueStore, key: &str) -> Option<User> {
    match store.get(key).await {
        Ok(Some(raw)) => serde_json::from_str::<Option<User>>(&raw).ok().flatten(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Could not read marker {}: {}", key, e);
            None
        }
    }
}

/// The session marker wins over the durable one.
pub async fn current_user(stores: MarkerStores<'_>, key: &str) -> Option<User> {
    match read(stores.session, key).await {
        Some(user) => Some(user),
        None => read(stores.durable, key).await,
    }
}

pub async fn clear(stores: MarkerStores<'_>, key: &str) -> AppResult<()> {
    stores.session.remove(key).await?;
    stores.durable.remove(key).await
}
