use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::connection::Connections;
use crate::execution::{ExecutionItem, PinData};
use crate::node::NodeDef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDef {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub name: String,
  #[serde(default)]
  pub active: bool,
  pub nodes: Vec<NodeDef>,
  #[serde(default)]
  pub connections: Connections,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub settings: Option<Map<String, Value>>,
  /// A `null` pin reads as an empty pin; the node still counts as pinned.
  #[serde(
    default,
    deserialize_with = "nullable_pins",
    skip_serializing_if = "Option::is_none"
  )]
  pub pin_data: Option<PinData>,
}

fn nullable_pins<'de, D>(deserializer: D) -> Result<Option<PinData>, D::Error>
where
  D: Deserializer<'de>,
{
  let pins: Option<std::collections::HashMap<String, Option<Vec<ExecutionItem>>>> =
    Option::deserialize(deserializer)?;
  Ok(pins.map(|pins| {
    pins
      .into_iter()
      .map(|(name, items)| (name, items.unwrap_or_default()))
      .collect()
  }))
}

impl WorkflowDef {
  /// Get a node definition by name.
  pub fn get_node(&self, name: &str) -> Option<&NodeDef> {
    self.nodes.iter().find(|node| node.name == name)
  }
}
