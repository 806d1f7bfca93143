//! Module list command

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Modify, Style, Width},
    Table, Tabled,
};

use super::load_repository;
use crate::cli::ListArgs;
use crate::output;

#[derive(Tabled, Serialize)]
struct ModuleRow {
    name: String,
    alias: String,
    version: String,
    order: i64,
    status: String,
    path: String,
    description: String,
}

/// List discovered modules
///
/// Supports:
/// - All modules: `modkit list`
/// - Filter by status: `modkit list --enabled` / `modkit list --disabled`
/// - JSON output: `modkit list --json`
pub fn run(args: ListArgs, config: Option<&Utf8Path>) -> Result<()> {
    let repository = load_repository(config)?;

    let modules = if args.enabled {
        repository.all_enabled()
    } else if args.disabled {
        repository.all_disabled()
    } else {
        repository.all()
    }
    .context("Failed to scan modules")?;

    let mut rows = Vec::with_capacity(modules.len());
    for module in &modules {
        let enabled = module.is_enabled()?;
        rows.push(ModuleRow {
            name: module.name().to_string(),
            alias: module.alias().to_string(),
            version: if module.version().is_empty() {
                "-".to_string()
            } else {
                module.version().to_string()
            },
            order: module.priority(),
            status: if enabled { "enabled" } else { "disabled" }.to_string(),
            path: module.path().display().to_string(),
            description: module.description().to_string(),
        });
    }

    if args.json {
        let json = serde_json::to_string_pretty(&rows)
            .context("Failed to serialize modules to JSON")?;
        println!("{}", json);
    } else if rows.is_empty() {
        output::warning("No modules found");
    } else {
        let count = rows.len();
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        table.with(Modify::new(Columns::new(6..7)).with(Width::wrap(50).keep_words(true)));
        println!("{}", table);
        output::info(&format!("{} module(s)", count));
    }

    Ok(())
}
