use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use trellis_editor::{Document, DocumentStore, FileStore, Node, Scope};

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Document to print (overrides config)
    pub document: Option<String>,

    /// Print only this page (id or slug)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Show node ids
    #[arg(long)]
    pub ids: bool,
}

pub fn tree(args: TreeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let document_key = args.document.as_deref().unwrap_or(&config.document);
    let document = FileStore::new(cwd).load(document_key)?;

    println!("{} {}", "🌳".green(), document.name.bold());
    for line in outline(&document, args.page.as_deref(), args.ids) {
        println!("{}", line);
    }
    Ok(())
}

/// Indented outline of every tree (or only the page matching `only`)
pub fn outline(document: &Document, only: Option<&str>, show_ids: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for scope in document.scopes() {
        if only.is_some() && !matches!(scope, Scope::Page(_)) {
            continue;
        }
        let heading = match &scope {
            Scope::Header => "header".to_string(),
            Scope::Footer => "footer".to_string(),
            Scope::Page(id) => match document.page(id) {
                Some(page) => {
                    if only.is_some_and(|key| key != page.id && key != page.slug) {
                        continue;
                    }
                    let home = if page.is_homepage { " (home)" } else { "" };
                    format!("page {} {}{}", page.name, page.slug, home)
                }
                None => continue,
            },
        };
        let roots = document.roots(&scope).map(Vec::as_slice).unwrap_or_default();
        lines.push(format!("{} ({} roots)", heading, roots.len()));
        for root in roots {
            push_node(&mut lines, root, 1, show_ids);
        }
    }
    lines
}

fn push_node(lines: &mut Vec<String>, node: &Node, depth: usize, show_ids: bool) {
    let indent = "  ".repeat(depth);
    let mut line = format!("{}{}", indent, node.node_type());
    if let Some(name) = &node.name {
        line.push_str(&format!(" \"{}\"", name));
    }
    if show_ids {
        line.push_str(&format!(" #{}", node.id));
    }
    if node.locked {
        line.push_str(" [locked]");
    }
    lines.push(line);

    let slots = node.slots();
    let panels = slots.len() > 1 || node.children().is_none();
    for slot in slots {
        if panels {
            lines.push(format!("{}  panel #{}", indent, slot.id));
            for child in slot.nodes {
                push_node(lines, child, depth + 2, show_ids);
            }
        } else {
            for child in slot.nodes {
                push_node(lines, child, depth + 1, show_ids);
            }
        }
    }
}
