use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::collections::HashMap;
use trellis_editor::tree::{self, validate_tree};
use trellis_editor::{Document, DocumentStore, FileStore};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Document to check (overrides config)
    pub document: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

/// One structural problem found in a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Tree the problem is in (`header`, `footer`, `page:<id>`), or `document`
    pub scope: String,
    pub message: String,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let document_key = args.document.as_deref().unwrap_or(&config.document);
    let document = FileStore::new(cwd).load(document_key)?;

    // Invalid breakpoints make every compile fail, so report them here too
    let mut issues = check_document(&document);
    if let Err(e) = config.compile_options() {
        issues.push(Issue {
            scope: "config".to_string(),
            message: e.to_string(),
        });
    }

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else {
        println!("🔍 {} {}", "Checking".green().bold(), document_key);
        for issue in &issues {
            println!("  {} [{}] {}", "error".red().bold(), issue.scope, issue.message);
        }
        if issues.is_empty() {
            println!("  {} No issues found!", "✓".green());
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("{} issue(s) found in {}", issues.len(), document_key))
    }
}

/// Containment, identifier uniqueness and page-level invariants
pub fn check_document(document: &Document) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut owners: HashMap<String, String> = HashMap::new();

    for scope in document.scopes() {
        let Some(roots) = document.roots(&scope) else {
            continue;
        };
        let scope_name = scope.to_string();

        issues.extend(validate_tree(roots).into_iter().map(|issue| Issue {
            scope: scope_name.clone(),
            message: issue.to_string(),
        }));

        for id in tree::collect_ids(roots) {
            if let Some(first) = owners.get(&id) {
                if *first != scope_name {
                    issues.push(Issue {
                        scope: scope_name.clone(),
                        message: format!("identifier `{}` is also used in {}", id, first),
                    });
                }
            } else {
                owners.insert(id, scope_name.clone());
            }
        }
    }

    if document.pages.is_empty() {
        issues.push(Issue {
            scope: "document".to_string(),
            message: "document has no pages".to_string(),
        });
    }
    let homepages = document.pages.iter().filter(|p| p.is_homepage).count();
    if homepages > 1 {
        issues.push(Issue {
            scope: "document".to_string(),
            message: format!("{} pages are flagged as homepage", homepages),
        });
    }

    let mut slugs: HashMap<&str, &str> = HashMap::new();
    for page in &document.pages {
        if let Some(other) = slugs.insert(page.slug.as_str(), page.id.as_str()) {
            issues.push(Issue {
                scope: format!("page:{}", page.id),
                message: format!("slug `{}` is also used by page `{}`", page.slug, other),
            });
        }
    }

    issues
}
