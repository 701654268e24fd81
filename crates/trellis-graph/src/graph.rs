use std::collections::{HashMap, HashSet};

use tracing::debug;
use trellis_config::ConnectionType;

use crate::connection::Connection;
use crate::error::GraphError;
use crate::node::Node;

/// Options for [`DirectedGraph::remove_node`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveNodeOptions {
  /// Connect every former producer of the node directly to every former
  /// consumer.
  pub reconnect_connections: bool,
}

/// Directed graph of workflow nodes and their port-level connections.
///
/// Cycles are allowed. A graph is built per request, mutated by a single
/// owner and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
  nodes: HashMap<String, Node>,
  /// Node names in insertion order.
  node_order: Vec<String>,
  /// Adjacency list: node name -> outgoing connections.
  adjacency: HashMap<String, Vec<Connection>>,
  /// Reverse adjacency: node name -> incoming connections.
  reverse_adjacency: HashMap<String, Vec<Connection>>,
}

impl DirectedGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a node. Adding a name that is already present replaces the
  /// stored attributes and keeps its connections.
  pub fn add_node(&mut self, node: Node) -> &mut Self {
    let name = node.name().to_string();
    if self.nodes.insert(name.clone(), node).is_none() {
      self.node_order.push(name);
    }
    self
  }

  pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) -> &mut Self {
    for node in nodes {
      self.add_node(node);
    }
    self
  }

  /// Register a connection between two registered nodes.
  pub fn add_connection(&mut self, connection: Connection) -> Result<&mut Self, GraphError> {
    self.validate_connection(&connection)?;
    self.insert_connection(connection);
    Ok(self)
  }

  /// Register several connections. Nothing is added if any of them
  /// references an unknown node.
  pub fn add_connections(
    &mut self,
    connections: impl IntoIterator<Item = Connection>,
  ) -> Result<&mut Self, GraphError> {
    let connections: Vec<Connection> = connections.into_iter().collect();
    for connection in &connections {
      self.validate_connection(connection)?;
    }
    for connection in connections {
      self.insert_connection(connection);
    }
    Ok(self)
  }

  /// Remove a single connection. Returns whether it was present.
  pub fn remove_connection(&mut self, connection: &Connection) -> bool {
    let removed = match self.adjacency.get_mut(&connection.from) {
      Some(outgoing) => {
        let before = outgoing.len();
        outgoing.retain(|c| c != connection);
        outgoing.len() != before
      }
      None => false,
    };

    if let Some(incoming) = self.reverse_adjacency.get_mut(&connection.to) {
      incoming.retain(|c| c != connection);
    }

    removed
  }

  /// Remove a node and every connection touching it.
  ///
  /// With `reconnect_connections`, each incoming connection is paired with
  /// each outgoing connection and replaced by a direct `main` connection that
  /// keeps the producer's output index and the consumer's input index. The
  /// new connections are added to the graph and returned. Self-loops on the
  /// removed node have no counterpart after removal and are dropped.
  pub fn remove_node(
    &mut self,
    name: &str,
    options: RemoveNodeOptions,
  ) -> Result<Vec<Connection>, GraphError> {
    if self.nodes.remove(name).is_none() {
      return Err(GraphError::NodeNotFound(name.to_string()));
    }
    self.node_order.retain(|n| n != name);

    let incoming = self.reverse_adjacency.remove(name).unwrap_or_default();
    let outgoing = self.adjacency.remove(name).unwrap_or_default();

    for connection in &incoming {
      if let Some(siblings) = self.adjacency.get_mut(&connection.from) {
        siblings.retain(|c| c != connection);
      }
    }
    for connection in &outgoing {
      if let Some(siblings) = self.reverse_adjacency.get_mut(&connection.to) {
        siblings.retain(|c| c != connection);
      }
    }

    let mut reconnected: Vec<Connection> = Vec::new();
    if options.reconnect_connections {
      for inbound in incoming.iter().filter(|c| c.from != name) {
        for outbound in outgoing.iter().filter(|c| c.to != name) {
          let connection = Connection {
            from: inbound.from.clone(),
            output_index: inbound.output_index,
            connection_type: ConnectionType::Main,
            input_index: outbound.input_index,
            to: outbound.to.clone(),
          };
          if !reconnected.contains(&connection) {
            reconnected.push(connection);
          }
        }
      }

      for connection in &reconnected {
        self.insert_connection(connection.clone());
      }
    }

    debug!(
      node = %name,
      incoming = incoming.len(),
      outgoing = outgoing.len(),
      reconnected = reconnected.len(),
      "node removed"
    );

    Ok(reconnected)
  }

  /// Remove every disabled node, reconnecting around it.
  ///
  /// Returns the connections created by the reconnection that are still part
  /// of the graph once all disabled nodes are gone.
  pub fn remove_disabled_nodes(&mut self) -> Vec<Connection> {
    let disabled: Vec<String> = self
      .get_nodes()
      .filter(|node| node.is_disabled())
      .map(|node| node.name().to_string())
      .collect();

    let mut created: Vec<Connection> = Vec::new();
    for name in disabled {
      let options = RemoveNodeOptions {
        reconnect_connections: true,
      };
      if let Ok(reconnected) = self.remove_node(&name, options) {
        created.extend(reconnected);
      }
    }

    let mut seen = HashSet::new();
    created.retain(|c| self.contains_connection(c) && seen.insert(c.clone()));
    created
  }

  pub fn has_node(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  pub fn get_node(&self, name: &str) -> Option<&Node> {
    self.nodes.get(name)
  }

  /// All nodes in insertion order.
  pub fn get_nodes(&self) -> impl Iterator<Item = &Node> {
    self.node_order.iter().filter_map(|name| self.nodes.get(name))
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// All connections, grouped by source node in node insertion order.
  pub fn get_connections(&self) -> impl Iterator<Item = &Connection> {
    self
      .node_order
      .iter()
      .filter_map(|name| self.adjacency.get(name))
      .flatten()
  }

  pub fn contains_connection(&self, connection: &Connection) -> bool {
    self
      .adjacency
      .get(&connection.from)
      .is_some_and(|outgoing| outgoing.contains(connection))
  }

  /// Outgoing connections of a node, in insertion order.
  pub fn get_direct_children(&self, name: &str) -> &[Connection] {
    self
      .adjacency
      .get(name)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Incoming connections of a node, in insertion order.
  pub fn get_direct_parents(&self, name: &str) -> &[Connection] {
    self
      .reverse_adjacency
      .get(name)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Every node reachable from `name` through one or more connections.
  ///
  /// If a cycle leads back to `name`, `name` itself is part of the result.
  pub fn get_children(&self, name: &str) -> HashSet<&Node> {
    let mut children = HashSet::new();
    let mut stack = vec![name];

    while let Some(current) = stack.pop() {
      for connection in self.get_direct_children(current) {
        if let Some(child) = self.nodes.get(&connection.to) {
          if children.insert(child) {
            stack.push(child.name());
          }
        }
      }
    }

    children
  }

  fn validate_connection(&self, connection: &Connection) -> Result<(), GraphError> {
    for endpoint in [&connection.from, &connection.to] {
      if !self.nodes.contains_key(endpoint) {
        return Err(GraphError::InvalidConnection {
          from: connection.from.clone(),
          to: connection.to.clone(),
          node: endpoint.clone(),
        });
      }
    }
    Ok(())
  }

  fn insert_connection(&mut self, connection: Connection) {
    let outgoing = self.adjacency.entry(connection.from.clone()).or_default();
    if outgoing.contains(&connection) {
      return;
    }
    outgoing.push(connection.clone());
    self
      .reverse_adjacency
      .entry(connection.to.clone())
      .or_default()
      .push(connection);
  }
}

/// Graphs are equal when they hold the same nodes (by name) and the same set
/// of connections, regardless of insertion order.
impl PartialEq for DirectedGraph {
  fn eq(&self, other: &Self) -> bool {
    if self.nodes != other.nodes {
      return false;
    }
    let ours: HashSet<&Connection> = self.get_connections().collect();
    let theirs: HashSet<&Connection> = other.get_connections().collect();
    ours == theirs
  }
}

impl Eq for DirectedGraph {}
