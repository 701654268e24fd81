use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDef {
  /// Unique name of the node within its workflow.
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  /// Node type identifier, e.g. "trellis-nodes.httpRequest".
  #[serde(rename = "type")]
  pub node_type: String,
  #[serde(default = "default_type_version")]
  pub type_version: f64,
  #[serde(default)]
  pub position: [f64; 2],
  #[serde(default)]
  pub parameters: Map<String, Value>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub disabled: bool,
  /// Number of declared output ports. Absent means a single output.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub outputs: Option<usize>,
  /// Fields the engine does not interpret (notes, credentials, ...).
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

fn default_type_version() -> f64 {
  1.0
}

impl NodeDef {
  pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      id: None,
      node_type: node_type.into(),
      type_version: default_type_version(),
      position: [0.0, 0.0],
      parameters: Map::new(),
      disabled: false,
      outputs: None,
      extra: Map::new(),
    }
  }
}
