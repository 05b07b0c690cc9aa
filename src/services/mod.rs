mod kv_store;
mod redis_service;
mod credential_store;
pub mod marker;

pub use kv_store::{ClientScopedStore, InMemoryStore, KeyValueStore, SessionScopedStore};
pub use redis_service::RedisService;
pub use credential_store::CredentialStore;
pub use marker::MarkerStores;
