mod auth;
mod client;

pub use auth::require_login;
pub use client::{assign_client_id, ClientId};
