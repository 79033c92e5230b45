//! CLI argument parsing for lattice.

use clap::{Parser, Subcommand};
use lattice::{EdgeKind, NodeId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lat",
    about = "A personal knowledge graph of thoughts and actions",
    version,
    after_help = "Logs are written to: ~/.local/share/lattice/logs/lattice.log"
)]
pub struct Cli {
    /// Path to the graph file (default: $LATTICE_FILE, then
    /// ~/.local/share/lattice/graph.json)
    #[arg(short = 'f', long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the graph as an indented hierarchy
    #[command(alias = "ls")]
    List {
        /// Filter: key=value pairs, or bare keys that must be present
        filters: Vec<String>,
    },

    /// Show a single node with all of its attributes
    Show {
        /// Node uid
        uid: NodeId,
    },

    /// Add a node
    #[command(alias = "a")]
    Add {
        /// Parent node to nest the new node under
        #[arg(short, long)]
        parent: Option<NodeId>,

        /// <name words...> [key=value...]; "due=Oct 16" style dates are
        /// normalized
        #[arg(required = true)]
        args: Vec<String>,
    },

    /// Update a node's attributes
    #[command(alias = "u")]
    Update {
        /// Node uid
        uid: NodeId,

        /// Replace the whole attribute set instead of merging
        #[arg(long)]
        replace: bool,

        /// Remove an attribute (repeatable)
        #[arg(long = "rm", value_name = "KEY")]
        rm: Vec<String>,

        /// [name words...] [key=value...]
        args: Vec<String>,
    },

    /// Delete a node and every link touching it
    #[command(alias = "d")]
    Delete {
        /// Node uid
        uid: NodeId,
    },

    /// Link two nodes, or remove a link
    #[command(alias = "l")]
    Link {
        /// Source node
        src: NodeId,

        /// Destination node
        dst: NodeId,

        /// Relationship type (parent_of, related_to, precedes)
        #[arg(default_value = "related_to")]
        kind: EdgeKind,

        /// Extra edge attributes as key=value pairs
        kvs: Vec<String>,

        /// Remove the link instead of creating it
        #[arg(short, long)]
        delete: bool,
    },

    /// Open the interactive shell
    Shell,
}
