use serde::{Deserialize, Serialize};

/// A staff member as listed by the store, with their current workload.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
   pub id: String,
   pub name: String,
   pub assigned_count: i32,
}

/// The agent a conversation is assigned to (embedded form).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AssignedAgent {
   pub id: String,
   pub name: String,
}
