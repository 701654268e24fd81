//! Start node resolution over small workflow graphs.
//!
//! Diagram legend:
//! - `0` the output has no run data, `1` the output has run data
//! - `►►` marks the destination
//! - `PD` marks a node with pinned data

use serde_json::json;
use trellis_config::{ExecutionItem, PinData, RunData, TaskData, WorkflowDef};
use trellis_graph::{Connection, DirectedGraph, Node};
use trellis_partial::{SourceData, find_start_nodes, find_start_nodes_with};

fn item() -> ExecutionItem {
  ExecutionItem {
    json: json!({ "value": 1 }).as_object().cloned().unwrap_or_default(),
    ..Default::default()
  }
}

/// A single recorded run; `outputs[i]` says whether main output `i` has data.
fn ran(outputs: &[bool]) -> Vec<TaskData> {
  vec![TaskData::with_main_outputs(
    outputs
      .iter()
      .map(|has_data| has_data.then(|| vec![item()]))
      .collect(),
  )]
}

fn build(nodes: &[&str], connections: Vec<Connection>) -> DirectedGraph {
  let mut graph = DirectedGraph::new();
  graph
    .add_nodes(nodes.iter().map(|name| Node::new(*name)))
    .add_connections(connections)
    .expect("valid test graph");
  graph
}

fn node(graph: &DirectedGraph, name: &str) -> Node {
  graph.get_node(name).cloned().expect("node in test graph")
}

fn source(connection: Connection) -> SourceData {
  SourceData {
    connection,
    previous_node_run: 0,
  }
}

fn names(start_nodes: &[trellis_partial::StartNodeData]) -> Vec<&str> {
  start_nodes.iter().map(|s| s.node.name()).collect()
}

//  ┌───────┐
//  │trigger│
//  └───────┘
#[test]
fn test_dirty_trigger_is_the_only_start_node() {
  let graph = build(&["trigger", "destination"], vec![Connection::new("trigger", "destination")]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &RunData::new(),
    &PinData::new(),
  );

  assert_eq!(start_nodes.len(), 1);
  assert_eq!(start_nodes[0].node.name(), "trigger");
  assert!(start_nodes[0].source_data.is_empty());
}

//  ┌───────┐1  ►►┌───────────┐
//  │trigger├────►│destination│
//  └───────┘     └───────────┘
#[test]
fn test_clean_destination_is_a_start_node() {
  let graph = build(&["trigger", "destination"], vec![Connection::new("trigger", "destination")]);
  let run_data = RunData::from([
    ("trigger".to_string(), ran(&[true])),
    ("destination".to_string(), ran(&[true])),
  ]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &run_data,
    &PinData::new(),
  );

  assert_eq!(start_nodes.len(), 1);
  assert_eq!(start_nodes[0].node.name(), "destination");
  assert_eq!(
    start_nodes[0].source_data,
    vec![source(Connection::new("trigger", "destination"))]
  );
}

//  ┌───────┐1  ┌────┐    ►►┌───────────┐
//  │trigger├──►│node├─────►│destination│
//  └───────┘   └────┘      └───────────┘
#[test]
fn test_first_dirty_node_on_the_path_is_the_start_node() {
  let graph = build(
    &["trigger", "node", "destination"],
    vec![
      Connection::new("trigger", "node"),
      Connection::new("node", "destination"),
    ],
  );
  let run_data = RunData::from([("trigger".to_string(), ran(&[true]))]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &run_data,
    &PinData::new(),
  );

  assert_eq!(names(&start_nodes), vec!["node"]);
  assert_eq!(
    start_nodes[0].source_data,
    vec![source(Connection::new("trigger", "node"))]
  );
}

//                 ┌─────┐
//              1┌►│node1│
//  ┌───────┐   │ └─────┘
//  │  if   ├───┤
//  └───────┘   │ ┌───────────┐►►
//              0└►│destination│
//                 └───────────┘
#[test]
fn test_outputs_without_run_data_are_not_followed() {
  let graph = build(
    &["trigger", "if", "node1", "destination"],
    vec![
      Connection::new("trigger", "if"),
      Connection::new("if", "node1"),
      Connection::new("if", "destination").with_output_index(1),
    ],
  );
  let run_data = RunData::from([
    ("trigger".to_string(), ran(&[true])),
    ("if".to_string(), ran(&[true, false])),
    ("destination".to_string(), ran(&[true])),
  ]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &run_data,
    &PinData::new(),
  );

  // node1 is dirty and reachable through output 0, destination sits behind
  // output 1 which produced nothing
  assert_eq!(names(&start_nodes), vec!["node1"]);
}

#[test]
fn test_trigger_with_empty_run_list_is_clean() {
  let graph = build(&["trigger", "destination"], vec![Connection::new("trigger", "destination")]);
  let run_data = RunData::from([("trigger".to_string(), vec![])]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &run_data,
    &PinData::new(),
  );

  // clean, but there is no run whose outputs could be followed
  assert!(start_nodes.is_empty());
}

#[test]
fn test_null_pin_in_persisted_workflow_keeps_node_clean() {
  let workflow: WorkflowDef = serde_json::from_value(json!({
    "name": "pinned",
    "nodes": [
      { "name": "Start", "type": "trellis-nodes.manualTrigger" },
      { "name": "Fetch", "type": "trellis-nodes.httpRequest" }
    ],
    "connections": {
      "Start": { "main": [[{ "node": "Fetch", "type": "main", "index": 0 }]] }
    },
    "pinData": { "Start": null }
  }))
  .unwrap();

  let graph = DirectedGraph::from_workflow(&workflow).unwrap();
  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "Start"),
    &node(&graph, "Fetch"),
    &RunData::new(),
    workflow.pin_data.as_ref().unwrap(),
  );

  assert!(start_nodes.is_empty());
}

#[test]
fn test_empty_output_counts_as_no_run_data() {
  let graph = build(
    &["trigger", "destination"],
    vec![Connection::new("trigger", "destination")],
  );
  let run_data = RunData::from([(
    "trigger".to_string(),
    vec![TaskData::with_main_outputs(vec![Some(vec![])])],
  )]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &run_data,
    &PinData::new(),
  );

  assert!(start_nodes.is_empty());
}

//  ┌───────┐1 ┌─────┐1 ┌─────┐
//  │trigger├─►│node1├─►│node2├─┐
//  └───────┘  └──▲──┘  └─────┘ │1
//                └─────────────┘
#[test]
fn test_cycles_terminate_without_start_nodes() {
  let graph = build(
    &["trigger", "node1", "node2", "destination"],
    vec![
      Connection::new("trigger", "node1"),
      Connection::new("node1", "node2"),
      Connection::new("node2", "node1"),
    ],
  );
  let run_data = RunData::from([
    ("trigger".to_string(), ran(&[true])),
    ("node1".to_string(), ran(&[true])),
    ("node2".to_string(), ran(&[true])),
  ]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &run_data,
    &PinData::new(),
  );

  assert!(start_nodes.is_empty());
}

//  ┌───────┐1 ┌─────┐1 ┌─────┐
//  │trigger├─►│node1├─►│node2├─┐
//  └───────┘  └──▲──┘  └──┬──┘ │1
//                └────────┼────┘
//                         │1  ►►┌───────────┐
//                         └────►│destination│
//                               └───────────┘
#[test]
fn test_destination_behind_a_cycle_is_found() {
  let graph = build(
    &["trigger", "node1", "node2", "destination"],
    vec![
      Connection::new("trigger", "node1"),
      Connection::new("node1", "node2"),
      Connection::new("node2", "node1"),
      Connection::new("node2", "destination").with_output_index(1),
    ],
  );
  let run_data = RunData::from([
    ("trigger".to_string(), ran(&[true])),
    ("node1".to_string(), ran(&[true])),
    ("node2".to_string(), ran(&[true, true])),
  ]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &run_data,
    &PinData::new(),
  );

  assert_eq!(names(&start_nodes), vec!["destination"]);
  assert_eq!(
    start_nodes[0].source_data,
    vec![source(
      Connection::new("node2", "destination").with_output_index(1)
    )]
  );
}

//              1 ┌──────┐
//  ┌───────┐ ┌──►│      │
//  │trigger├─┤   │ node │
//  └───────┘ └──►│      │
//              1 └──────┘
#[test]
fn test_node_reached_over_two_connections_is_two_start_nodes() {
  let graph = build(
    &["trigger", "node"],
    vec![
      Connection::new("trigger", "node"),
      Connection::new("trigger", "node").with_output_index(1),
    ],
  );
  let run_data = RunData::from([("trigger".to_string(), ran(&[true, true]))]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "node"),
    &run_data,
    &PinData::new(),
  );

  assert_eq!(names(&start_nodes), vec!["node", "node"]);
  assert_eq!(start_nodes[0].source_data[0].connection.output_index, 0);
  assert_eq!(start_nodes[1].source_data[0].connection.output_index, 1);
}

//              ┌─────┐
//  ┌───────┐ ┌►│  a  ├─┐ ┌─────┐   ┌─────┐
//  │trigger├─┤ └─────┘ ├►│  c  ├──►│  d  │
//  └───────┘ │ ┌─────┐ │ └─────┘   └─────┘
//            └►│  b  ├─┘
//              └─────┘
#[test]
fn test_same_connection_reached_twice_accumulates_sources() {
  let graph = build(
    &["trigger", "a", "b", "c", "d"],
    vec![
      Connection::new("trigger", "a"),
      Connection::new("trigger", "b"),
      Connection::new("a", "c"),
      Connection::new("b", "c"),
      Connection::new("c", "d"),
    ],
  );
  let run_data = RunData::from([
    ("trigger".to_string(), ran(&[true])),
    ("a".to_string(), ran(&[true])),
    ("b".to_string(), ran(&[true])),
    ("c".to_string(), ran(&[true])),
  ]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "d"),
    &run_data,
    &PinData::new(),
  );

  assert_eq!(names(&start_nodes), vec!["d"]);
  assert_eq!(
    start_nodes[0].source_data,
    vec![
      source(Connection::new("c", "d")),
      source(Connection::new("c", "d"))
    ]
  );
}

//  ┌───────┐1 ┌─────┐PD ►►┌───────────┐
//  │trigger├─►│node ├────►│destination│
//  └───────┘  └─────┘     └───────────┘
#[test]
fn test_pinned_node_is_clean_but_has_no_outputs_to_follow() {
  let graph = build(
    &["trigger", "node", "destination"],
    vec![
      Connection::new("trigger", "node"),
      Connection::new("node", "destination"),
    ],
  );
  let run_data = RunData::from([("trigger".to_string(), ran(&[true]))]);
  let pin_data = PinData::from([("node".to_string(), vec![item()])]);

  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &run_data,
    &pin_data,
  );

  // the walk reads run data only, so nothing below the pinned node is reached
  assert!(start_nodes.is_empty());
}

#[test]
fn test_custom_dirty_check() {
  let graph = build(
    &["trigger", "node", "destination"],
    vec![
      Connection::new("trigger", "node"),
      Connection::new("node", "destination"),
    ],
  );
  let run_data = RunData::from([
    ("trigger".to_string(), ran(&[true])),
    ("node".to_string(), ran(&[true])),
  ]);

  // treat "node" as changed since its last run
  let changed = |node: &Node, run_data: &RunData, pin_data: &PinData| {
    node.name() == "node" || trellis_partial::is_dirty(node, run_data, pin_data)
  };

  let start_nodes = find_start_nodes_with(
    &changed,
    &graph,
    &node(&graph, "trigger"),
    &node(&graph, "destination"),
    &run_data,
    &PinData::new(),
  );

  assert_eq!(names(&start_nodes), vec!["node"]);
}

#[test]
fn test_from_persisted_workflow() {
  let workflow: WorkflowDef = serde_json::from_value(json!({
    "name": "orders",
    "nodes": [
      { "name": "Start", "type": "trellis-nodes.manualTrigger" },
      { "name": "Fetch", "type": "trellis-nodes.httpRequest" },
      { "name": "Split", "type": "trellis-nodes.if", "outputs": 2 },
      { "name": "Notify", "type": "trellis-nodes.slack" },
      { "name": "Archive", "type": "trellis-nodes.s3" }
    ],
    "connections": {
      "Start": { "main": [[{ "node": "Fetch", "type": "main", "index": 0 }]] },
      "Fetch": { "main": [[{ "node": "Split", "type": "main", "index": 0 }]] },
      "Split": {
        "main": [
          [{ "node": "Notify", "type": "main", "index": 0 }],
          [{ "node": "Archive", "type": "main", "index": 0 }]
        ]
      }
    },
    "pinData": {
      "Notify": [{ "json": { "sent": true } }]
    }
  }))
  .unwrap();
  let run_data: RunData = serde_json::from_value(json!({
    "Start": [{ "data": { "main": [[{ "json": {} }]] } }],
    "Fetch": [{ "data": { "main": [[{ "json": { "id": 1 } }]] } }],
    "Split": [{ "data": { "main": [[{ "json": { "id": 1 } }], [{ "json": { "id": 2 } }]] } }]
  }))
  .unwrap();

  let graph = DirectedGraph::from_workflow(&workflow).unwrap();
  let start_nodes = find_start_nodes(
    &graph,
    &node(&graph, "Start"),
    &node(&graph, "Archive"),
    &run_data,
    workflow.pin_data.as_ref().unwrap(),
  );

  // Notify is pinned and clean; Archive never ran
  assert_eq!(names(&start_nodes), vec!["Archive"]);
  assert_eq!(
    serde_json::to_value(&start_nodes[0].source_data).unwrap(),
    json!([{
      "connection": { "from": "Split", "outputIndex": 1, "type": "main", "inputIndex": 0, "to": "Archive" },
      "previousNodeRun": 0
    }])
  );
}
