//! Key-value storage behind the form.
//!
//! Two lifetimes exist: a durable store that outlives the browser session
//! (Redis) and a session-scoped store that ends with it (the cookie session).
//! Both hold plain JSON text under fixed keys.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_sessions::Session;
use crate::errors::AppResult;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Overwrites whatever is stored under `key`.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// Values scoped to one browser session.
#[derive(Clone)]
pub struct SessionScopedStore {
    session: Session,
}

impl SessionScopedStore {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl KeyValueStore for SessionScopedStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.session.get::<String>(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.session.insert(key, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.session.remove::<String>(key).await?;
        Ok(())
    }
}

/// One client's slice of a shared durable store.
pub struct ClientScopedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl ClientScopedStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, client_id: &str) -> Self {
        Self {
            inner,
            prefix: format!("client:{}:", client_id),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for ClientScopedStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(&self.key(key)).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(&self.key(key), value).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(&self.key(key)).await
    }
}

/// Process-local store, used when no Redis is wanted and in tests.
#[derive(Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.entries().insert(key.to_string(), value.to_string());
        store
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}
