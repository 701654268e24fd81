use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::ConnectionType;

/// The receiving end of a persisted connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
  /// Name of the destination node.
  pub node: String,
  #[serde(rename = "type", default)]
  pub connection_type: ConnectionType,
  /// Input port index on the destination node.
  pub index: usize,
}

/// Outgoing connections of one node, by connection type and output index.
///
/// The editor writes `null` for output slots without connections, those read
/// back as empty slots.
pub type NodeConnections = BTreeMap<ConnectionType, OutputSlots>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSlots(
  #[serde(deserialize_with = "nullable_slots")] pub Vec<Vec<ConnectionTarget>>,
);

/// All persisted connections, keyed by the source node name.
pub type Connections = BTreeMap<String, NodeConnections>;

fn nullable_slots<'de, D>(deserializer: D) -> Result<Vec<Vec<ConnectionTarget>>, D::Error>
where
  D: Deserializer<'de>,
{
  let slots: Vec<Option<Vec<ConnectionTarget>>> = Vec::deserialize(deserializer)?;
  Ok(slots.into_iter().map(Option::unwrap_or_default).collect())
}
