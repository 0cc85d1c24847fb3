use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use trellis_editor::tree;
use trellis_editor::{Document, EditorDocument, FileStore, IdGenerator, Mutation, NodeType, Scope};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Site name
    #[arg(short, long, default_value = "My Site")]
    pub name: String,

    /// Document file to create
    #[arg(short, long, default_value = "site.json")]
    pub document: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Trellis site...".bright_blue().bold());

    let config = Config {
        document: args.document.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let document_path = PathBuf::from(cwd).join(&args.document);
    if document_path.exists() && !args.force {
        println!("  {} Kept existing {}", "•".dimmed(), args.document);
    } else {
        let mut starter = starter_document(&args.name, &args.document)?;
        starter.save(&mut FileStore::new(cwd))?;
        println!("  {} Created {}", "✓".green(), args.document);
    }

    println!();
    println!("{}", "✅ Site initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: trellis tree");
    println!("  2. Run: trellis compile");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}

/// One page with a section holding a heading and a paragraph, stored under `key`
pub fn starter_document(name: &str, key: &str) -> Result<EditorDocument> {
    let document = Document::new(name);
    let home = document
        .homepage()
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow!("new document has no homepage"))?;
    let mut editor = EditorDocument::new(key, document);
    let mut ids = IdGenerator::new();

    let section = editor
        .apply(
            &Mutation::InsertNode {
                scope: Scope::Page(home.clone()),
                target: None,
                node_type: NodeType::Section,
            },
            &mut ids,
        )?
        .created
        .ok_or_else(|| anyhow!("section was not created"))?;

    // The default section comes with one row holding one column
    let column = editor
        .current()
        .page(&home)
        .and_then(|page| tree::find_by_id(&page.content, &section))
        .and_then(|s| s.children()?.first()?.children()?.first())
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow!("default section has no column"))?;

    for node_type in [NodeType::Heading, NodeType::Text] {
        editor.apply(
            &Mutation::InsertNode {
                scope: Scope::Page(home.clone()),
                target: Some(column.clone()),
                node_type,
            },
            &mut ids,
        )?;
    }
    Ok(editor)
}
