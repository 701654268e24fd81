//! Conversion between [`DirectedGraph`] and the persisted [`WorkflowDef`].

use std::collections::HashSet;

use serde_json::{Map, Value};
use trellis_config::{ConnectionTarget, ConnectionType, Connections, PinData, WorkflowDef};

use crate::connection::Connection;
use crate::error::GraphError;
use crate::graph::DirectedGraph;
use crate::node::Node;

/// Workflow attributes that are not part of the graph structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowParams {
  pub id: Option<String>,
  pub name: String,
  pub active: bool,
  pub settings: Option<Map<String, Value>>,
  pub pin_data: Option<PinData>,
}

impl WorkflowParams {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Default::default()
    }
  }
}

impl From<&WorkflowDef> for WorkflowParams {
  fn from(workflow: &WorkflowDef) -> Self {
    Self {
      id: workflow.id.clone(),
      name: workflow.name.clone(),
      active: workflow.active,
      settings: workflow.settings.clone(),
      pin_data: workflow.pin_data.clone(),
    }
  }
}

impl DirectedGraph {
  /// Build a graph from a persisted workflow.
  ///
  /// The connection type of each edge is taken from the source side of the
  /// connection map.
  pub fn from_workflow(workflow: &WorkflowDef) -> Result<Self, GraphError> {
    let mut graph = DirectedGraph::new();

    let mut names = HashSet::new();
    for node in &workflow.nodes {
      if !names.insert(node.name.as_str()) {
        return Err(GraphError::DuplicateNode(node.name.clone()));
      }
      graph.add_node(Node::from(node.clone()));
    }

    for (from, by_type) in &workflow.connections {
      for (connection_type, slots) in by_type {
        for (output_index, targets) in slots.0.iter().enumerate() {
          for target in targets {
            graph.add_connection(Connection {
              from: from.clone(),
              output_index,
              connection_type: connection_type.clone(),
              input_index: target.index,
              to: target.node.clone(),
            })?;
          }
        }
      }
    }

    Ok(graph)
  }

  /// Write the graph back into the persisted workflow shape.
  ///
  /// `main` output slots are padded up to the node's declared output count so
  /// unconnected ports are still listed.
  pub fn to_workflow(&self, params: WorkflowParams) -> WorkflowDef {
    let mut connections = Connections::new();

    for connection in self.get_connections() {
      let slots = &mut connections
        .entry(connection.from.clone())
        .or_default()
        .entry(connection.connection_type.clone())
        .or_default()
        .0;

      if slots.len() <= connection.output_index {
        slots.resize_with(connection.output_index + 1, Vec::new);
      }
      slots[connection.output_index].push(ConnectionTarget {
        node: connection.to.clone(),
        connection_type: connection.connection_type.clone(),
        index: connection.input_index,
      });
    }

    for (from, by_type) in connections.iter_mut() {
      let declared = self.get_node(from).map(Node::outputs).unwrap_or(1);
      if let Some(main) = by_type.get_mut(&ConnectionType::Main) {
        if main.0.len() < declared {
          main.0.resize_with(declared, Vec::new);
        }
      }
    }

    WorkflowDef {
      id: params.id,
      name: params.name,
      active: params.active,
      nodes: self
        .get_nodes()
        .map(|node| node.definition().clone())
        .collect(),
      connections,
      settings: params.settings,
      pin_data: params.pin_data,
    }
  }
}
