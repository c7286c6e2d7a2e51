use serde::{Deserialize, Serialize};

/// A canned response template, used purely to pre-fill the composer.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuickReply {
   pub id: String,
   pub title: String,
   pub content: String,
   pub category: Option<String>,
}
