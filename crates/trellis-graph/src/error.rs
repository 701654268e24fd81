use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
  #[error("node not found: {0}")]
  NodeNotFound(String),

  #[error("connection references unknown node '{node}': from={from}, to={to}")]
  InvalidConnection {
    from: String,
    to: String,
    node: String,
  },

  #[error("duplicate node name: {0}")]
  DuplicateNode(String),
}
