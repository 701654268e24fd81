//! Partial execution planning for Trellis.
//!
//! Given a graph, the data recorded by earlier runs and the data pinned by
//! the user, this crate decides where a partial execution toward a chosen
//! destination node has to begin.
//!
//! # Architecture
//!
//! ```text
//! find_start_nodes(graph, trigger, destination, run_data, pin_data)
//! └── depth-first walk from the trigger
//!     ├── DirtyCheck::is_dirty(node) - stop, node is a start node
//!     ├── node == destination        - stop, node is a start node
//!     └── follow outputs that recorded run data (get_incoming_data)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use trellis_graph::DirectedGraph;
//! use trellis_partial::find_start_nodes;
//!
//! let graph = DirectedGraph::from_workflow(&workflow)?;
//! let trigger = graph.get_node("Start").unwrap();
//! let destination = graph.get_node("Send Email").unwrap();
//!
//! for start in find_start_nodes(&graph, trigger, destination, &run_data, &pin_data) {
//!     println!("{} ({} sources)", start.node.name(), start.source_data.len());
//! }
//! ```

mod dirty;
mod incoming;
mod start_nodes;

pub use dirty::{DataPresence, DirtyCheck, is_dirty};
pub use incoming::get_incoming_data;
pub use start_nodes::{SourceData, StartNodeData, find_start_nodes, find_start_nodes_with};
