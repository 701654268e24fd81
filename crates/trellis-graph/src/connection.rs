use serde::{Deserialize, Serialize};
use trellis_config::ConnectionType;

/// A directed edge from an output port of one node to an input port of
/// another.
///
/// Endpoints are referenced by node name. Connections compare by value: two
/// connections with the same endpoints, ports and type are the same edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
  pub from: String,
  pub output_index: usize,
  #[serde(rename = "type")]
  pub connection_type: ConnectionType,
  pub input_index: usize,
  pub to: String,
}

impl Connection {
  /// A `main` connection from output 0 of `from` to input 0 of `to`.
  pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
    Self {
      from: from.into(),
      output_index: 0,
      connection_type: ConnectionType::Main,
      input_index: 0,
      to: to.into(),
    }
  }

  pub fn with_output_index(mut self, output_index: usize) -> Self {
    self.output_index = output_index;
    self
  }

  pub fn with_input_index(mut self, input_index: usize) -> Self {
    self.input_index = input_index;
    self
  }

  pub fn with_type(mut self, connection_type: ConnectionType) -> Self {
    self.connection_type = connection_type;
    self
  }
}
