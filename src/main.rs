use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use trellis_config::{RunData, WorkflowDef};
use trellis_graph::{DirectedGraph, RemoveNodeOptions, WorkflowParams};
use trellis_partial::{StartNodeData, find_start_nodes};

/// Trellis - workflow graph tooling and partial execution planning
#[derive(Parser)]
#[command(name = "trellis")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.trellis)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Log debug output to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve the nodes a partial execution has to start from
  Plan {
    /// Path to the workflow file, or the name of a stored workflow
    workflow: PathBuf,

    /// The node the partial execution should reach
    #[arg(long)]
    destination: String,

    /// The trigger to walk from (default: first node without parents)
    #[arg(long)]
    trigger: Option<String>,

    /// Run data of the previous execution (default: stdin when piped)
    #[arg(long)]
    run_data: Option<PathBuf>,
  },

  /// List every node reachable from a node
  Children {
    /// Path to the workflow file, or the name of a stored workflow
    workflow: PathBuf,

    #[arg(long)]
    node: String,
  },

  /// Remove a node and print the resulting workflow
  RemoveNode {
    /// Path to the workflow file, or the name of a stored workflow
    workflow: PathBuf,

    #[arg(long)]
    node: String,

    /// Connect the node's parents directly to its children
    #[arg(long)]
    reconnect: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  init_tracing(cli.verbose);

  let data_dir = match cli.data_dir {
    Some(data_dir) => data_dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".trellis"),
  };

  match cli.command {
    Some(Commands::Plan {
      workflow,
      destination,
      trigger,
      run_data,
    }) => {
      let workflow = load_workflow(&workflow, &data_dir)?;
      let run_data = match run_data {
        Some(path) => load_run_data(&path, &data_dir)?,
        None => read_run_data_from_stdin()?,
      };

      let start_nodes = plan(&workflow, &destination, trigger.as_deref(), &run_data)?;
      println!("{}", serde_json::to_string_pretty(&start_nodes)?);
    }
    Some(Commands::Children { workflow, node }) => {
      let workflow = load_workflow(&workflow, &data_dir)?;
      for name in children(&workflow, &node)? {
        println!("{}", name);
      }
    }
    Some(Commands::RemoveNode {
      workflow,
      node,
      reconnect,
    }) => {
      let workflow = load_workflow(&workflow, &data_dir)?;
      let updated = remove_node(&workflow, &node, reconnect)?;
      println!("{}", serde_json::to_string_pretty(&updated)?);
    }
    None => {
      println!("trellis - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

/// Use `path` when it exists, otherwise treat it as the name of a file stored
/// under `<data_dir>/<dir>/`.
fn resolve_path(path: &Path, data_dir: &Path, dir: &str) -> PathBuf {
  if path.exists() {
    return path.to_path_buf();
  }

  let stored = data_dir.join(dir).join(path);
  if stored.extension().is_some() {
    stored
  } else {
    stored.with_extension("json")
  }
}

fn load_workflow(path: &Path, data_dir: &Path) -> Result<WorkflowDef> {
  let workflow_file = resolve_path(path, data_dir, "workflows");

  let content = std::fs::read_to_string(&workflow_file)
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;

  let workflow: WorkflowDef = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))?;

  info!(workflow = %workflow.name, nodes = workflow.nodes.len(), "loaded workflow");
  Ok(workflow)
}

fn load_run_data(path: &Path, data_dir: &Path) -> Result<RunData> {
  let run_data_file = resolve_path(path, data_dir, "run-data");

  let content = std::fs::read_to_string(&run_data_file)
    .with_context(|| format!("failed to read run data file: {}", run_data_file.display()))?;

  parse_run_data(&content)
    .with_context(|| format!("failed to parse run data file: {}", run_data_file.display()))
}

fn read_run_data_from_stdin() -> Result<RunData> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    // Nothing piped, nothing ran yet
    return Ok(RunData::new());
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read run data from stdin")?;

  parse_run_data(&input).context("failed to parse run data JSON from stdin")
}

fn parse_run_data(input: &str) -> Result<RunData> {
  if input.trim().is_empty() {
    return Ok(RunData::new());
  }
  Ok(serde_json::from_str(input)?)
}

fn build_graph(workflow: &WorkflowDef) -> Result<DirectedGraph> {
  DirectedGraph::from_workflow(workflow)
    .with_context(|| format!("invalid workflow graph: {}", workflow.name))
}

fn plan(
  workflow: &WorkflowDef,
  destination: &str,
  trigger: Option<&str>,
  run_data: &RunData,
) -> Result<Vec<StartNodeData>> {
  let mut graph = build_graph(workflow)?;

  let reconnected = graph.remove_disabled_nodes();
  debug!(reconnected = reconnected.len(), "removed disabled nodes");

  let destination = graph
    .get_node(destination)
    .with_context(|| format!("destination '{}' not found in workflow", destination))?;

  let trigger = match trigger {
    Some(name) => graph
      .get_node(name)
      .with_context(|| format!("trigger '{}' not found in workflow", name))?,
    None => graph
      .get_nodes()
      .find(|node| graph.get_direct_parents(node.name()).is_empty())
      .context("workflow has no node without parents to start from")?,
  };

  let pin_data = workflow.pin_data.clone().unwrap_or_default();

  Ok(find_start_nodes(
    &graph,
    trigger,
    destination,
    run_data,
    &pin_data,
  ))
}

fn children(workflow: &WorkflowDef, node: &str) -> Result<Vec<String>> {
  let graph = build_graph(workflow)?;

  if !graph.has_node(node) {
    bail!("node '{}' not found in workflow", node);
  }

  let mut names: Vec<String> = graph
    .get_children(node)
    .into_iter()
    .map(|child| child.name().to_string())
    .collect();
  names.sort();
  Ok(names)
}

fn remove_node(workflow: &WorkflowDef, node: &str, reconnect: bool) -> Result<WorkflowDef> {
  let mut graph = build_graph(workflow)?;

  let options = RemoveNodeOptions {
    reconnect_connections: reconnect,
  };
  let reconnected = graph
    .remove_node(node, options)
    .with_context(|| format!("failed to remove node '{}'", node))?;
  info!(node = %node, reconnected = reconnected.len(), "removed node");

  Ok(graph.to_workflow(WorkflowParams::from(workflow)))
}
