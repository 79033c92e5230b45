//! lattice CLI - a personal knowledge graph of thoughts and actions.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use lattice::{display, parse, EdgeKind, NodeFilter, Store};
use log::info;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

mod cli;
mod shell;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lattice")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("lattice.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Resolve the graph file: flag, then environment, then the data dir.
fn graph_file(cli: &Cli) -> PathBuf {
    cli.file
        .clone()
        .or_else(|| std::env::var_os("LATTICE_FILE").map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("lattice")
                .join("graph.json")
        })
}

fn run(cli: Cli) -> Result<()> {
    let mut store = Store::open(graph_file(&cli)).context("Failed to open graph")?;

    match cli.command {
        Command::List { filters } => {
            if filters.is_empty() {
                let lines = display::hierarchy_lines(store.graph());
                if lines.is_empty() {
                    println!("{}", "Nothing here yet; try 'lat add'".dimmed());
                }
                for line in lines {
                    println!("{}", line);
                }
            } else {
                let mut filter = NodeFilter::new();
                for token in &filters {
                    filter = match token.split_once('=') {
                        Some((key, value)) => filter.eq(key, value),
                        None => filter.has(token.as_str()),
                    };
                }
                for (uid, attrs) in store.find(&filter) {
                    println!("{}) {}", uid.to_string().cyan(), lattice::node_name(attrs));
                }
            }
        }

        Command::Show { uid } => match store.node(uid) {
            Some(attrs) => println!("{}", display::node_detail(uid, attrs)),
            None => {
                eprintln!("{} Node {} not found", "✗".red(), uid);
                std::process::exit(1);
            }
        },

        Command::Add { parent, args } => {
            let (name, mut attrs) = parse::split_name_attrs(&args);
            if !name.is_empty() {
                attrs.insert("name".to_string(), Value::from(name));
            }
            parse::normalize_dates(&mut attrs);

            let uid = store.create_node(attrs).context("Failed to create node")?;
            println!("{} Created node {}", "✓".green(), uid.to_string().cyan());

            if let Some(parent) = parent {
                // The node outlives a bad parent reference; warn and move on.
                match store.create_edge(parent, uid, EdgeKind::ParentOf, Default::default()) {
                    Ok(_) => println!("{} Linked {} to {}", "✓".green(), parent, uid),
                    Err(e) => {
                        log::warn!("No parent link for {}: {}", uid, e);
                        eprintln!("{} {}", "!".yellow(), e);
                    }
                }
            }
        }

        Command::Update { uid, replace, rm, args } => {
            let (name, mut attrs) = parse::split_name_attrs(&args);
            if !name.is_empty() {
                attrs.insert("name".to_string(), Value::from(name));
            }
            parse::normalize_dates(&mut attrs);

            if replace {
                store.update_node(uid, attrs).context("Failed to update node")?;
            } else {
                for key in rm {
                    attrs.insert(key, Value::Null);
                }
                if attrs.is_empty() {
                    eyre::bail!("nothing to change; pass key=value pairs or --rm keys");
                }
                store.patch_node(uid, attrs).context("Failed to update node")?;
            }
            println!("{} Updated node {}", "✓".green(), uid.to_string().cyan());
        }

        Command::Delete { uid } => {
            store.delete_node(uid).context("Failed to delete node")?;
            println!("{} Deleted node {}", "✓".green(), uid);
        }

        Command::Link { src, dst, kind, kvs, delete } => {
            if delete {
                store.delete_edge(src, dst).context("Failed to remove link")?;
                println!("{} Unlinked {} from {}", "✓".green(), src, dst);
            } else {
                let attrs = parse::parse_key_values(&kvs)?;
                store.create_edge(src, dst, kind, attrs).context("Failed to link nodes")?;
                println!(
                    "{} {} {} {}",
                    "✓".green(),
                    src.to_string().cyan(),
                    kind.to_string().dimmed(),
                    dst.to_string().cyan()
                );
            }
        }

        Command::Shell => {
            shell::run(store)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
