//! Start node resolution.
//!
//! Walks a graph depth-first from a trigger toward a destination and stops on
//! every branch at the first node that cannot reuse its previous output. Those
//! nodes, together with the connections that led to them, are where a partial
//! execution has to begin.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument, trace};
use trellis_config::{PinData, RunData};
use trellis_graph::{Connection, DirectedGraph, Node};

use crate::dirty::{DataPresence, DirtyCheck};
use crate::incoming::get_incoming_data;

/// One path by which the resolver reached a start node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceData {
  /// Connection the resolver followed into the start node.
  pub connection: Connection,
  /// Run of the upstream node that fed the connection.
  pub previous_node_run: usize,
}

/// A node a partial execution has to start from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartNodeData {
  pub node: Node,
  /// Every path the node was reached by. Empty for the trigger itself.
  pub source_data: Vec<SourceData>,
}

/// Start nodes are grouped by the connection they were reached through, so
/// the same node reached over two connections is two entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum StartKey {
  Trigger,
  Connection(Connection),
}

/// Start nodes in order of first discovery.
#[derive(Debug, Default)]
struct StartNodes {
  index: HashMap<StartKey, usize>,
  entries: Vec<StartNodeData>,
}

impl StartNodes {
  fn record(&mut self, node: &Node, source: Option<SourceData>) {
    let key = match &source {
      Some(source) => StartKey::Connection(source.connection.clone()),
      None => StartKey::Trigger,
    };

    let position = match self.index.get(&key) {
      Some(position) => *position,
      None => {
        self.entries.push(StartNodeData {
          node: node.clone(),
          source_data: Vec::new(),
        });
        let position = self.entries.len() - 1;
        self.index.insert(key, position);
        position
      }
    };

    if let Some(source) = source {
      self.entries[position].source_data.push(source);
    }
  }
}

/// A pending visit. `seen` holds the nodes on the path to `current` and is
/// owned per branch.
struct Visit<'a> {
  current: &'a Node,
  seen: HashSet<&'a str>,
  source: Option<SourceData>,
}

/// Find the nodes a partial execution toward `destination` has to start
/// from, using [`DataPresence`] to decide which nodes are dirty.
pub fn find_start_nodes(
  graph: &DirectedGraph,
  trigger: &Node,
  destination: &Node,
  run_data: &RunData,
  pin_data: &PinData,
) -> Vec<StartNodeData> {
  find_start_nodes_with(&DataPresence, graph, trigger, destination, run_data, pin_data)
}

/// Like [`find_start_nodes`], with a caller supplied dirty check.
///
/// On each branch the walk stops at the first node that is dirty or is the
/// destination and records it as a start node. Outputs without recorded run
/// data are not followed. A node already on the current path ends the branch
/// without a start node.
#[instrument(
  name = "find_start_nodes",
  skip_all,
  fields(trigger = %trigger.name(), destination = %destination.name())
)]
pub fn find_start_nodes_with<C>(
  check: &C,
  graph: &DirectedGraph,
  trigger: &Node,
  destination: &Node,
  run_data: &RunData,
  pin_data: &PinData,
) -> Vec<StartNodeData>
where
  C: DirtyCheck + ?Sized,
{
  let mut start_nodes = StartNodes::default();
  let mut stack = vec![Visit {
    current: trigger,
    seen: HashSet::new(),
    source: None,
  }];

  while let Some(Visit {
    current,
    mut seen,
    source,
  }) = stack.pop()
  {
    if check.is_dirty(current, run_data, pin_data) {
      debug!(node = %current.name(), "dirty node is a start node");
      start_nodes.record(current, source);
      continue;
    }

    if current == destination {
      debug!(node = %current.name(), "destination is a start node");
      start_nodes.record(current, source);
      continue;
    }

    if !seen.insert(current.name()) {
      trace!(node = %current.name(), "cycle, branch has no start node");
      continue;
    }

    let mut children = Vec::new();
    for connection in graph.get_direct_children(current.name()) {
      // Run 0 is always consulted; a node is assumed to have run once.
      let has_output = get_incoming_data(
        run_data,
        current.name(),
        0,
        &connection.connection_type,
        connection.output_index,
      )
      .is_some_and(|items| !items.is_empty());

      if !has_output {
        trace!(
          node = %current.name(),
          output_index = connection.output_index,
          "output has no run data, skipping branch"
        );
        continue;
      }

      let Some(child) = graph.get_node(&connection.to) else {
        continue;
      };

      children.push(Visit {
        current: child,
        seen: seen.clone(),
        source: Some(SourceData {
          connection: connection.clone(),
          previous_node_run: 0,
        }),
      });
    }

    // reversed so children are visited in connection order
    stack.extend(children.into_iter().rev());
  }

  debug!(start_nodes = start_nodes.entries.len(), "start nodes resolved");
  start_nodes.entries
}
