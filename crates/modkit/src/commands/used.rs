//! Use and unuse commands

use anyhow::Result;
use camino::Utf8Path;

use super::load_repository;
use crate::cli::UseArgs;
use crate::output;

/// Remember a module as the default target of later commands
pub fn use_module(args: UseArgs, config: Option<&Utf8Path>) -> Result<()> {
    let repository = load_repository(config)?;
    repository.set_used(&args.name)?;

    let used = repository.get_used_now()?.unwrap_or(args.name);
    output::success(&format!("Module [{}] used successfully", used));
    Ok(())
}

pub fn unuse(config: Option<&Utf8Path>) -> Result<()> {
    let repository = load_repository(config)?;
    repository.forget_used()?;
    output::success("Previous module used successfully forgotten");
    Ok(())
}
