//! Interactive shell over the store.
//!
//! Errors are recovered at the command boundary: a failed command prints
//! its message and the loop keeps going. Mutations persist as they happen.

use colored::*;
use eyre::Result;
use lattice::{display, parse, EdgeKind, NodeFilter, NodeId, Store};
use log::info;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;

const PROMPT: &str = "(lattice)> ";

const HELP: &str = "\
Commands:
  list|ls [key=value|key...]   list the hierarchy, optionally filtered
  show <uid>                   show one node
  add [parent] <name...> [key=value...]   add a node (parent uid optional)
  update <uid> <name...> [key=value...]   merge attributes into a node
  rm <uid> <key...>            remove attributes from a node
  delete <uid>                 delete a node
  link <src> <dst> [type] [key=value...]  link two nodes
  unlink <src> <dst>           remove a link
  help                         this text
  quit|exit                    leave the shell";

/// Run the read-eval loop until quit or EOF.
pub fn run(mut store: Store) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    info!("Shell session started");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                match dispatch(&mut store, line) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("{}", "Saving work".dimmed());
    store.save()?;
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn dispatch(store: &mut Store, line: &str) -> Result<Flow> {
    let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
    let (command, rest) = (tokens[0].as_str(), &tokens[1..]);

    match command {
        "list" | "ls" => cmd_list(store, rest)?,
        "show" => cmd_show(store, rest)?,
        "add" => cmd_add(store, rest)?,
        "update" => cmd_update(store, rest)?,
        "rm" => cmd_rm(store, rest)?,
        "delete" => cmd_delete(store, rest)?,
        "link" => cmd_link(store, rest)?,
        "unlink" => cmd_unlink(store, rest)?,
        "help" => println!("{}", HELP),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => eyre::bail!("unknown command '{}'; try 'help'", other),
    }
    Ok(Flow::Continue)
}

fn parse_uid(token: Option<&String>, what: &str) -> Result<NodeId> {
    let token = token.ok_or_else(|| eyre::eyre!("missing {} uid", what))?;
    token
        .parse::<NodeId>()
        .map_err(|_| eyre::eyre!("'{}' is not a valid uid", token))
}

fn cmd_list(store: &Store, rest: &[String]) -> Result<()> {
    if rest.is_empty() {
        for line in display::hierarchy_lines(store.graph()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut filter = NodeFilter::new();
    for token in rest {
        filter = match token.split_once('=') {
            Some((key, value)) => filter.eq(key, value),
            None => filter.has(token.as_str()),
        };
    }
    for (uid, attrs) in store.find(&filter) {
        println!("{}) {}", uid, lattice::node_name(attrs));
    }
    Ok(())
}

fn cmd_show(store: &Store, rest: &[String]) -> Result<()> {
    let uid = parse_uid(rest.first(), "node")?;
    match store.node(uid) {
        Some(attrs) => println!("{}", display::node_detail(uid, attrs)),
        None => eyre::bail!("node {} not found", uid),
    }
    Ok(())
}

fn cmd_add(store: &mut Store, rest: &[String]) -> Result<()> {
    // A leading uid token is the parent; everything else is name + attrs.
    let (parent, rest) = match rest.first().and_then(|t| t.parse::<NodeId>().ok()) {
        Some(uid) => (Some(uid), &rest[1..]),
        None => (None, rest),
    };

    let (name, mut attrs) = parse::split_name_attrs(rest);
    if name.is_empty() && attrs.is_empty() {
        eyre::bail!("nothing to add; usage: add [parent] <name...> [key=value...]");
    }
    if !name.is_empty() {
        attrs.insert("name".to_string(), Value::from(name));
    }
    parse::normalize_dates(&mut attrs);

    let uid = store.create_node(attrs)?;
    println!("{} Created node {}", "✓".green(), uid.to_string().cyan());
    if let Some(parent) = parent {
        store.create_edge(parent, uid, EdgeKind::ParentOf, Default::default())?;
        println!("{} Linked {} to {}", "✓".green(), parent, uid);
    }
    Ok(())
}

fn cmd_update(store: &mut Store, rest: &[String]) -> Result<()> {
    let uid = parse_uid(rest.first(), "node")?;
    let (name, mut attrs) = parse::split_name_attrs(&rest[1..]);
    if !name.is_empty() {
        attrs.insert("name".to_string(), Value::from(name));
    }
    if attrs.is_empty() {
        eyre::bail!("nothing to update; usage: update <uid> <name...> [key=value...]");
    }
    parse::normalize_dates(&mut attrs);

    store.patch_node(uid, attrs)?;
    println!("{} Updated node {}", "✓".green(), uid.to_string().cyan());
    Ok(())
}

fn cmd_rm(store: &mut Store, rest: &[String]) -> Result<()> {
    let uid = parse_uid(rest.first(), "node")?;
    let keys = &rest[1..];
    if keys.is_empty() {
        eyre::bail!("no keys given; usage: rm <uid> <key...>");
    }

    let attrs = keys.iter().map(|k| (k.clone(), Value::Null)).collect();
    store.patch_node(uid, attrs)?;
    println!("{} Removed {} key(s) from {}", "✓".green(), keys.len(), uid);
    Ok(())
}

fn cmd_delete(store: &mut Store, rest: &[String]) -> Result<()> {
    let uid = parse_uid(rest.first(), "node")?;
    store.delete_node(uid)?;
    println!("{} Deleted node {}", "✓".green(), uid);
    Ok(())
}

fn cmd_link(store: &mut Store, rest: &[String]) -> Result<()> {
    let src = parse_uid(rest.first(), "source")?;
    let dst = parse_uid(rest.get(1), "destination")?;

    // Third token is an edge type when it parses as one; related_to
    // otherwise, with the token folded back into the attributes.
    let (kind, kv_tokens) = match rest.get(2).map(|t| t.parse::<EdgeKind>()) {
        Some(Ok(kind)) => (kind, &rest[3..]),
        _ => (EdgeKind::RelatedTo, &rest[2..]),
    };

    let attrs = parse::parse_key_values(kv_tokens)?;
    store.create_edge(src, dst, kind, attrs)?;
    println!(
        "{} {} {} {}",
        "✓".green(),
        src.to_string().cyan(),
        kind.to_string().dimmed(),
        dst.to_string().cyan()
    );
    Ok(())
}

fn cmd_unlink(store: &mut Store, rest: &[String]) -> Result<()> {
    let src = parse_uid(rest.first(), "source")?;
    let dst = parse_uid(rest.get(1), "destination")?;
    store.delete_edge(src, dst)?;
    println!("{} Unlinked {} from {}", "✓".green(), src, dst);
    Ok(())
}
