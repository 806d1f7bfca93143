//! Command implementations
//!
//! Every command loads `modules.yaml` (or the embedded defaults), builds a
//! repository from it and runs against the modules found on disk.

pub mod asset;
pub mod delete;
pub mod list;
pub mod requirements;
pub mod reset;
pub mod show;
pub mod status;
pub mod used;

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use modkit_core::ModulesConfig;
use modkit_modules::{EventSink, Module, ModuleRepository, TracingSink};
use std::sync::Arc;
use tracing::debug;

/// Build the repository described by the configuration
pub(crate) fn load_repository(config: Option<&Utf8Path>) -> Result<ModuleRepository> {
    let config = ModulesConfig::load(config).context("Failed to load modules configuration")?;
    debug!(
        "Scanning {:?} with the {} activator",
        config.scan_paths(),
        config.activator_name()
    );
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    ModuleRepository::from_config(&config, sink).context("Failed to set up module repository")
}

/// The named module, or the one recorded by `modkit use`
pub(crate) fn target_module(repository: &ModuleRepository, name: Option<&str>) -> Result<Module> {
    let name = match name {
        Some(name) => name.to_string(),
        None => repository.get_used_now()?.ok_or_else(|| {
            anyhow!("No module name given and no module in use (see `modkit use <name>`)")
        })?,
    };
    Ok(repository.find_or_fail(&name)?)
}
