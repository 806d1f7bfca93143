//! Module show command

use anyhow::{Context, Result};
use camino::Utf8Path;

use super::{load_repository, target_module};
use crate::cli::ShowArgs;
use crate::output;

pub fn run(args: ShowArgs, config: Option<&Utf8Path>) -> Result<()> {
    let repository = load_repository(config)?;
    let module = target_module(&repository, args.name.as_deref())?;

    if args.json {
        let document = module.json(None)?;
        let json = serde_json::to_string_pretty(document.attributes())
            .context("Failed to serialize manifest to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    output::header(&module.studly_name());
    output::kv("name", module.name());
    output::kv("alias", module.alias());
    output::kv("status", &output::status_label(module.is_enabled()?));
    if !module.version().is_empty() {
        output::kv("version", module.version());
    }
    if !module.description().is_empty() {
        output::kv("description", module.description());
    }
    output::kv("order", &module.priority().to_string());
    output::kv("path", &module.path().display().to_string());

    if !module.keywords().is_empty() {
        output::kv("keywords", &module.keywords().join(", "));
    }
    if !module.requires().is_empty() {
        output::kv("requires", &module.requires().join(", "));
    }
    if !module.providers().is_empty() {
        output::kv("providers", &module.providers().join(", "));
    }

    let missing = repository.missing_requirements(module.name())?;
    if !missing.is_empty() {
        output::warning(&format!(
            "{} requires modules that were not found: {}",
            module.name(),
            missing.join(", ")
        ));
    }

    Ok(())
}
