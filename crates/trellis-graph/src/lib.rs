//! Trellis Graph
//!
//! This crate provides the in-memory directed graph the engine works on.
//! A graph is built from a persisted `WorkflowDef` (or assembled by hand),
//! queried and edited, and written back without loss.
//!
//! Compared to the persisted form:
//! - Connection endpoints are validated against the registered nodes
//! - Nodes are identified by name
//! - Connections are individual values carrying both port indexes
//! - Nodes can be removed while keeping every data path they carried

mod connection;
mod error;
mod graph;
mod node;
mod workflow;

pub use connection::Connection;
pub use error::GraphError;
pub use graph::{DirectedGraph, RemoveNodeOptions};
pub use node::{NO_OP_NODE_TYPE, Node};
pub use workflow::WorkflowParams;
