use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use trellis_config::NodeDef;

/// Node type used by [`Node::new`] when the caller does not care about it.
pub const NO_OP_NODE_TYPE: &str = "trellis-nodes.noOp";

/// A node in a [`DirectedGraph`](crate::DirectedGraph).
///
/// Nodes are identified by name: two nodes with the same name are the same
/// node for equality, hashing and graph membership, whatever their other
/// attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node {
  definition: NodeDef,
}

impl Node {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      definition: NodeDef::new(name, NO_OP_NODE_TYPE),
    }
  }

  /// Return a copy of this node with the disabled flag set.
  pub fn disabled(mut self, disabled: bool) -> Self {
    self.definition.disabled = disabled;
    self
  }

  /// Return a copy of this node declaring `outputs` output ports.
  pub fn with_outputs(mut self, outputs: usize) -> Self {
    self.definition.outputs = Some(outputs);
    self
  }

  pub fn name(&self) -> &str {
    &self.definition.name
  }

  pub fn is_disabled(&self) -> bool {
    self.definition.disabled
  }

  /// Number of declared output ports.
  pub fn outputs(&self) -> usize {
    self.definition.outputs.unwrap_or(1)
  }

  pub fn definition(&self) -> &NodeDef {
    &self.definition
  }

  pub fn into_definition(self) -> NodeDef {
    self.definition
  }
}

impl From<NodeDef> for Node {
  fn from(definition: NodeDef) -> Self {
    Self { definition }
  }
}

impl PartialEq for Node {
  fn eq(&self, other: &Self) -> bool {
    self.name() == other.name()
  }
}

impl Eq for Node {}

impl Hash for Node {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.name().hash(state);
  }
}
