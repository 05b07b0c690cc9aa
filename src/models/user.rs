use serde::{Deserialize, Serialize};
use super::task::Task;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub email: String,
    pub password: String, // Plaintext, compared as-is at sign-in
    #[serde(default)]
    pub tasks: Vec<Task>,
    // Whatever else older records carry, written back untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            tasks: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}
