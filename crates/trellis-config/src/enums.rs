use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a connection between two node ports.
///
/// `main` carries regular item data. The `ai_*` kinds wire sub-nodes
/// (models, memories, tools) into their parent node. Unknown kinds are kept
/// verbatim so a workflow written by a newer editor still round-trips.
#[derive(
  Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum ConnectionType {
  #[default]
  Main,
  AiAgent,
  AiChain,
  AiDocument,
  AiEmbedding,
  AiLanguageModel,
  AiMemory,
  AiOutputParser,
  AiRetriever,
  AiTextSplitter,
  AiTool,
  AiVectorStore,
  Other(String),
}

impl ConnectionType {
  pub fn as_str(&self) -> &str {
    match self {
      ConnectionType::Main => "main",
      ConnectionType::AiAgent => "ai_agent",
      ConnectionType::AiChain => "ai_chain",
      ConnectionType::AiDocument => "ai_document",
      ConnectionType::AiEmbedding => "ai_embedding",
      ConnectionType::AiLanguageModel => "ai_languageModel",
      ConnectionType::AiMemory => "ai_memory",
      ConnectionType::AiOutputParser => "ai_outputParser",
      ConnectionType::AiRetriever => "ai_retriever",
      ConnectionType::AiTextSplitter => "ai_textSplitter",
      ConnectionType::AiTool => "ai_tool",
      ConnectionType::AiVectorStore => "ai_vectorStore",
      ConnectionType::Other(kind) => kind,
    }
  }
}

impl From<String> for ConnectionType {
  fn from(kind: String) -> Self {
    match kind.as_str() {
      "main" => ConnectionType::Main,
      "ai_agent" => ConnectionType::AiAgent,
      "ai_chain" => ConnectionType::AiChain,
      "ai_document" => ConnectionType::AiDocument,
      "ai_embedding" => ConnectionType::AiEmbedding,
      "ai_languageModel" => ConnectionType::AiLanguageModel,
      "ai_memory" => ConnectionType::AiMemory,
      "ai_outputParser" => ConnectionType::AiOutputParser,
      "ai_retriever" => ConnectionType::AiRetriever,
      "ai_textSplitter" => ConnectionType::AiTextSplitter,
      "ai_tool" => ConnectionType::AiTool,
      "ai_vectorStore" => ConnectionType::AiVectorStore,
      _ => ConnectionType::Other(kind),
    }
  }
}

impl From<ConnectionType> for String {
  fn from(kind: ConnectionType) -> Self {
    match kind {
      ConnectionType::Other(kind) => kind,
      known => known.as_str().to_string(),
    }
  }
}

impl fmt::Display for ConnectionType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
  New,
  Running,
  Success,
  Error,
  Canceled,
  Crashed,
  Waiting,
  Unknown,
}
