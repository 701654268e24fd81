use trellis_config::{ConnectionType, ExecutionItem, RunData};

/// Items one run of `node_name` produced on one output branch.
///
/// Returns `None` when the node never ran that often, or the branch recorded
/// no output.
pub fn get_incoming_data<'a>(
  run_data: &'a RunData,
  node_name: &str,
  run_index: usize,
  connection_type: &ConnectionType,
  output_index: usize,
) -> Option<&'a [ExecutionItem]> {
  run_data
    .get(node_name)?
    .get(run_index)?
    .output(connection_type, output_index)
    .map(Vec::as_slice)
}
