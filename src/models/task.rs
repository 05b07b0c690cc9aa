use serde::{Deserialize, Serialize};

// Tasks belong to the to-do pages; the form only carries them along.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Task(pub serde_json::Value);
