//! Execution data recorded by previous runs and pinned by users.
//!
//! These shapes are produced by the execution runtime and the editor. The
//! graph engine only reads them to decide which nodes still hold valid output.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::{ConnectionType, ExecutionStatus};

/// One item flowing between nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionItem {
  #[serde(default)]
  pub json: Map<String, Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub binary: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub paired_item: Option<Value>,
}

/// Output of one run, by connection type and output index.
///
/// An output slot is `None` when the run produced nothing on that branch.
pub type TaskDataConnections = BTreeMap<ConnectionType, Vec<Option<Vec<ExecutionItem>>>>;

/// Which upstream run fed a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSource {
  pub previous_node: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub previous_node_output: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub previous_node_run: Option<usize>,
}

/// Record of a single run of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
  #[serde(default)]
  pub start_time: i64,
  #[serde(default)]
  pub execution_time: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub execution_status: Option<ExecutionStatus>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<TaskDataConnections>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<Value>,
  #[serde(default)]
  pub source: Vec<Option<TaskSource>>,
}

impl TaskData {
  /// Build a successful run whose `main` outputs hold the given items.
  ///
  /// `None` marks an output branch that produced nothing.
  pub fn with_main_outputs(outputs: Vec<Option<Vec<ExecutionItem>>>) -> Self {
    let mut data = TaskDataConnections::new();
    data.insert(ConnectionType::Main, outputs);
    Self {
      execution_status: Some(ExecutionStatus::Success),
      data: Some(data),
      ..Default::default()
    }
  }

  /// Items produced on one output branch, if any were recorded.
  pub fn output(
    &self,
    connection_type: &ConnectionType,
    output_index: usize,
  ) -> Option<&Vec<ExecutionItem>> {
    self
      .data
      .as_ref()?
      .get(connection_type)?
      .get(output_index)?
      .as_ref()
  }
}

/// Runs recorded per node name, oldest first.
pub type RunData = HashMap<String, Vec<TaskData>>;

/// Fixed output per node name that replaces live execution.
pub type PinData = HashMap<String, Vec<ExecutionItem>>;
