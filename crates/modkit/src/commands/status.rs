//! Enable and disable commands

use anyhow::Result;
use camino::Utf8Path;
use modkit_modules::{Module, ModuleRepository};

use super::{load_repository, target_module};
use crate::cli::ToggleArgs;
use crate::output;

/// Enable modules: `modkit enable Blog Shop`, `modkit enable --all`
pub fn enable(args: ToggleArgs, config: Option<&Utf8Path>) -> Result<()> {
    toggle(args, config, true)
}

/// Disable modules: `modkit disable Blog`, `modkit disable --all`
pub fn disable(args: ToggleArgs, config: Option<&Utf8Path>) -> Result<()> {
    toggle(args, config, false)
}

fn toggle(args: ToggleArgs, config: Option<&Utf8Path>, enable: bool) -> Result<()> {
    let repository = load_repository(config)?;

    // Resolve every target first so a typo changes nothing
    let targets = targets(&repository, &args)?;
    if targets.is_empty() {
        output::warning("No modules found");
        return Ok(());
    }

    for module in targets {
        if module.is_status(enable)? {
            output::info(&format!(
                "Module [{}] is already {}",
                module.name(),
                if enable { "enabled" } else { "disabled" }
            ));
            continue;
        }

        if enable {
            module.enable()?;
            output::success(&format!("Module [{}] enabled successfully", module.name()));
        } else {
            module.disable()?;
            output::success(&format!("Module [{}] disabled successfully", module.name()));
        }
    }

    Ok(())
}

fn targets(repository: &ModuleRepository, args: &ToggleArgs) -> Result<Vec<Module>> {
    if args.all {
        return Ok(repository.all()?.into_vec());
    }
    if args.names.is_empty() {
        return Ok(vec![target_module(repository, None)?]);
    }
    let mut modules = Vec::with_capacity(args.names.len());
    for name in &args.names {
        modules.push(repository.find_or_fail(name)?);
    }
    Ok(modules)
}
