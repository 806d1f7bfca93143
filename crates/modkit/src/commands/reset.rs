//! Status reset command

use anyhow::Result;
use camino::Utf8Path;
use dialoguer::Confirm;

use super::load_repository;
use crate::cli::ResetArgs;
use crate::output;

/// Return every module to the default status: `modkit reset -y`
pub fn run(args: ResetArgs, config: Option<&Utf8Path>) -> Result<()> {
    let repository = load_repository(config)?;

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt("Clear the stored status of every module?")
            .default(false)
            .interact()?;

        if !confirmed {
            output::info("Cancelled");
            return Ok(());
        }
    }

    repository.reset_statuses()?;

    let status = if repository.activator().default_status() {
        "enabled"
    } else {
        "disabled"
    };
    output::success(&format!("Module statuses reset, every module is now {}", status));
    Ok(())
}
