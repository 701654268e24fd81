//! Trellis Config
//!
//! This crate contains the serializable workflow types for Trellis: workflow
//! definitions as the editor stores them, plus the run data and pin data
//! recorded around executions.
//!
//! Workflows can be loaded from:
//! - JSON files (via CLI with `trellis plan workflow.json`)
//! - Database storage (as JSON blobs)
//!
//! The graph engine converts these definitions into a `DirectedGraph` for
//! traversal and editing, and writes them back losslessly.

mod connection;
mod enums;
mod execution;
mod node;
mod workflow;

pub use connection::{ConnectionTarget, Connections, NodeConnections, OutputSlots};
pub use enums::{ConnectionType, ExecutionStatus};
pub use execution::{
  ExecutionItem, PinData, RunData, TaskData, TaskDataConnections, TaskSource,
};
pub use node::NodeDef;
pub use workflow::WorkflowDef;
