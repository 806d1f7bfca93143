//! Asset URL command

use anyhow::Result;
use camino::Utf8Path;

use super::load_repository;
use crate::cli::AssetArgs;

/// Print the public URL of `module:path`
pub fn run(args: AssetArgs, config: Option<&Utf8Path>) -> Result<()> {
    let repository = load_repository(config)?;
    println!("{}", repository.asset(&args.reference)?);
    Ok(())
}
