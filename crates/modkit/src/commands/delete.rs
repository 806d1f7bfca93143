//! Module delete command

use anyhow::Result;
use camino::Utf8Path;
use dialoguer::Confirm;

use super::load_repository;
use crate::cli::DeleteArgs;
use crate::output;

/// Delete a module directory and its activation record
///
/// Supports:
/// - Delete with confirmation: `modkit delete Blog`
/// - Skip the prompt: `modkit delete Blog -y`
pub fn run(args: DeleteArgs, config: Option<&Utf8Path>) -> Result<()> {
    let repository = load_repository(config)?;
    let module = repository.find_or_fail(&args.name)?;

    output::info(&format!(
        "This will remove {} and every file in it",
        module.path().display()
    ));

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete '{}'?", module.name()))
            .default(false)
            .interact()?;

        if !confirmed {
            output::info("Cancelled");
            return Ok(());
        }
    }

    repository.delete(module.name())?;

    if repository
        .get_used_now()?
        .is_some_and(|used| used.eq_ignore_ascii_case(module.name()))
    {
        repository.forget_used()?;
    }

    output::success(&format!("Module [{}] deleted", module.name()));
    Ok(())
}
