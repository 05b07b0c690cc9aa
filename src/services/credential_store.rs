//! The list of registered users, kept under one durable key.
//!
//! The list is read once when loaded. After that the in-memory copy is
//! authoritative and every change rewrites the whole list.

use std::sync::Arc;
use crate::config::StorageConfig;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use super::kv_store::KeyValueStore;
use super::marker::{self, MarkerStores};

pub struct CredentialStore {
    durable: Arc<dyn KeyValueStore>,
    keys: StorageConfig,
    users: Vec<User>,
}

impl CredentialStore {
    /// Missing, malformed or unreachable data all load as an empty list.
    pub async fn load(durable: Arc<dyn KeyValueStore>, keys: StorageConfig) -> Self {
        let users = match durable.get(&keys.users_key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed user list under {}: {}", keys.users_key, e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("User list unavailable, starting empty: {}", e);
                Vec::new()
            }
        };

        Self { durable, keys, users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    async fn persist(&self, users: &[User]) -> AppResult<()> {
        let raw = serde_json::to_string(users)?;
        self.durable.set(&self.keys.users_key, &raw).await
    }

    /// Adds a user in front of the list unless the e-mail is already taken.
    pub async fn register(&mut self, email: &str, password: &str) -> AppResult<()> {
        if self.users.iter().any(|user| user.email == email) {
            tracing::info!("Registration refused, e-mail already taken: {}", email);
            return Err(AppError::DuplicateEmail);
        }

        let mut users = Vec::with_capacity(self.users.len() + 1);
        users.push(User::new(email, password));
        users.extend(self.users.iter().cloned());

        self.persist(&users).await?;
        self.users = users;
        tracing::info!("Registered user: {}", email);
        Ok(())
    }

    /// Plaintext match on both fields. The outcome is written as the marker
    /// even when nothing matched, in which case the marker holds `null`.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        remember: bool,
        markers: MarkerStores<'_>,
    ) -> AppResult<User> {
        let found = self
            .users
            .iter()
            .find(|user| user.email == email && user.password == password)
            .cloned();

        marker::write(markers.pick(remember), &self.keys.marker_key, found.as_ref()).await?;

        match found {
            Some(user) => {
                tracing::info!("User signed in: {} (remember: {})", email, remember);
                Ok(user)
            }
            None => {
                tracing::info!("Sign-in failed for: {}", email);
                Err(AppError::AuthFailure)
            }
        }
    }
}
