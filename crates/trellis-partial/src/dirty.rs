//! Dirty checks: can a node's previous output be reused?

use trellis_config::{PinData, RunData};
use trellis_graph::Node;

/// Decides whether a node must run again.
///
/// Implementations must be pure: the resolver asks again for every node on
/// every branch it walks.
pub trait DirtyCheck {
  fn is_dirty(&self, node: &Node, run_data: &RunData, pin_data: &PinData) -> bool;
}

/// The default check: a node is clean once it has pinned data or run data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataPresence;

impl DirtyCheck for DataPresence {
  fn is_dirty(&self, node: &Node, run_data: &RunData, pin_data: &PinData) -> bool {
    is_dirty(node, run_data, pin_data)
  }
}

impl<F> DirtyCheck for F
where
  F: Fn(&Node, &RunData, &PinData) -> bool,
{
  fn is_dirty(&self, node: &Node, run_data: &RunData, pin_data: &PinData) -> bool {
    self(node, run_data, pin_data)
  }
}

/// Whether `node` has neither pinned data nor run data.
///
/// Only the presence of an entry counts: an empty pin or an empty list of
/// runs still marks the node clean.
///
/// Parameter changes since the last run and disabled parents are not
/// detected here; callers that track them plug in their own [`DirtyCheck`].
pub fn is_dirty(node: &Node, run_data: &RunData, pin_data: &PinData) -> bool {
  !pin_data.contains_key(node.name()) && !run_data.contains_key(node.name())
}
