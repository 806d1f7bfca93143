//! Module requirements command

use anyhow::Result;
use camino::Utf8Path;
use tabled::{settings::Style, Table, Tabled};

use super::{load_repository, target_module};
use crate::cli::RequirementsArgs;
use crate::output;

#[derive(Tabled)]
struct RequirementRow {
    name: String,
    status: String,
    path: String,
}

/// Show what a module requires
///
/// Direct requirements by default; `--transitive` prints the full chain in
/// load order, the module itself last.
pub fn run(args: RequirementsArgs, config: Option<&Utf8Path>) -> Result<()> {
    let repository = load_repository(config)?;
    let module = target_module(&repository, args.name.as_deref())?;

    let modules = if args.transitive {
        repository.resolve_load_order(module.name())?
    } else {
        repository.find_requirements(module.name())?
    };

    let mut rows = Vec::with_capacity(modules.len());
    for required in &modules {
        rows.push(RequirementRow {
            name: required.name().to_string(),
            status: if required.is_enabled()? { "enabled" } else { "disabled" }.to_string(),
            path: required.path().display().to_string(),
        });
    }

    if rows.is_empty() {
        output::info(&format!("Module [{}] has no requirements", module.name()));
    } else {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }

    for name in repository.missing_requirements(module.name())? {
        output::warning(&format!("Required module [{}] was not found", name));
    }

    Ok(())
}
