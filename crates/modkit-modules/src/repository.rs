//! Module repository
//!
//! Discovers modules under registered scan locations and answers lookups,
//! status filters and requirement queries. Nothing is cached: every query
//! re-scans the locations, so the filesystem is the only source of truth.

use crate::activator::ActivationStore;
use crate::collection::ModuleCollection;
use crate::dependency::DependencyResolver;
use crate::events::{EventSink, ModuleEvent, ModuleEventKind};
use crate::manifest::DEFAULT_MANIFEST;
use crate::module::Module;
use crate::scanner;
use modkit_core::naming;
use modkit_core::{Error, ModulesConfig, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default public URL prefix for module assets
pub const DEFAULT_ASSETS_URL: &str = "/modules";

/// Repository of modules found on disk
#[derive(Debug, Clone)]
pub struct ModuleRepository {
    paths: Vec<PathBuf>,
    manifest_name: String,
    recursive: bool,
    activator: Arc<ActivationStore>,
    assets_path: PathBuf,
    assets_url: String,
    used_storage_path: PathBuf,
}

impl ModuleRepository {
    /// Repository with no locations and conventional relative paths
    pub fn new(activator: Arc<ActivationStore>) -> Self {
        Self {
            paths: Vec::new(),
            manifest_name: DEFAULT_MANIFEST.to_string(),
            recursive: false,
            activator,
            assets_path: PathBuf::from("public/modules"),
            assets_url: DEFAULT_ASSETS_URL.to_string(),
            used_storage_path: PathBuf::from("storage/app/modules/modules.used"),
        }
    }

    /// Repository wired from configuration
    ///
    /// Resolves the activation backend eagerly, so a misconfigured activator
    /// fails here rather than on first use.
    pub fn from_config(config: &ModulesConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let activator = Arc::new(ActivationStore::from_config(config, sink)?);

        let mut repository = Self::new(activator)
            .with_manifest_name(config.manifest_name())
            .with_recursive(config.recursive_scan())
            .with_assets(
                config.assets_path().into_std_path_buf(),
                config.assets_url(),
            )
            .with_used_storage_path(config.used_storage_path().into_std_path_buf());

        for path in config.scan_paths() {
            repository.add_location(path.into_std_path_buf());
        }
        Ok(repository)
    }

    pub fn with_manifest_name(mut self, manifest_name: impl Into<String>) -> Self {
        self.manifest_name = manifest_name.into();
        self
    }

    /// Submodule-aware scanning
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_assets(
        mut self,
        assets_path: impl Into<PathBuf>,
        assets_url: impl Into<String>,
    ) -> Self {
        self.assets_path = assets_path.into();
        self.assets_url = assets_url.into();
        self
    }

    pub fn with_used_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.used_storage_path = path.into();
        self
    }

    /// Append a scan location; duplicates are kept as given
    pub fn add_location(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.paths.push(path.into());
        self
    }

    /// Registered scan locations
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn activator(&self) -> &Arc<ActivationStore> {
        &self.activator
    }

    pub fn manifest_name(&self) -> &str {
        &self.manifest_name
    }

    /// Discover modules in discovery order
    ///
    /// Missing locations are skipped. A malformed manifest fails the whole
    /// scan. When two directories declare the same name, the first one wins.
    /// Shared aliases are only reported; alias lookups return the first match.
    pub fn scan(&self) -> Result<Vec<Module>> {
        let mut modules = Vec::new();
        let mut seen = HashSet::new();
        let mut seen_aliases = HashSet::new();

        for location in &self.paths {
            for manifest_path in scanner::discover(location, &self.manifest_name, self.recursive) {
                let Some(dir) = manifest_path.parent() else {
                    continue;
                };
                let module = Module::load(dir, &self.manifest_name, Arc::clone(&self.activator))?;

                if !seen.insert(module.lower_name()) {
                    warn!(
                        "Module {} at {} shadowed by an earlier module of the same name",
                        module.name(),
                        dir.display()
                    );
                    continue;
                }
                if !seen_aliases.insert(naming::lower(module.alias())) {
                    warn!(
                        "Module {} at {} reuses alias {}",
                        module.name(),
                        dir.display(),
                        module.alias()
                    );
                }
                modules.push(module);
            }
        }

        debug!("Scanned {} modules", modules.len());
        Ok(modules)
    }

    /// All modules ordered by priority
    pub fn all(&self) -> Result<ModuleCollection> {
        Ok(ModuleCollection::ordered(self.scan()?))
    }

    /// Alias of [`all`](Self::all)
    pub fn to_collection(&self) -> Result<ModuleCollection> {
        self.all()
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.scan()?.len())
    }

    /// Case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Result<Option<Module>> {
        Ok(self.all()?.find(name).cloned())
    }

    /// Case-insensitive lookup by alias
    pub fn find_by_alias(&self, alias: &str) -> Result<Option<Module>> {
        Ok(self.all()?.find_by_alias(alias).cloned())
    }

    /// Lookup that fails with `ModuleNotFound`
    pub fn find_or_fail(&self, name: &str) -> Result<Module> {
        self.find(name)?
            .ok_or_else(|| Error::module_not_found(name))
    }

    /// Clear every stored status, including modules under locations added
    /// after the repository was built
    pub fn reset_statuses(&self) -> Result<()> {
        self.activator.reset()?;
        for module in self.scan()? {
            self.activator.delete(&module)?;
        }
        debug!("Reset module statuses");
        Ok(())
    }

    /// Modules whose activation status equals `status`
    pub fn get_by_status(&self, status: bool) -> Result<ModuleCollection> {
        self.all()?.with_status(status)
    }

    pub fn all_enabled(&self) -> Result<ModuleCollection> {
        self.get_by_status(true)
    }

    pub fn all_disabled(&self) -> Result<ModuleCollection> {
        self.get_by_status(false)
    }

    /// Direct requirements of a module, resolved to modules
    ///
    /// Only one level deep. Names matching no discovered module are skipped.
    pub fn find_requirements(&self, name: &str) -> Result<Vec<Module>> {
        let all = self.all()?;
        let module = all
            .find(name)
            .ok_or_else(|| Error::module_not_found(name))?;

        let mut requirements = Vec::new();
        for required in module.requires() {
            match all.find(required) {
                Some(found) => requirements.push(found.clone()),
                None => debug!(
                    "Requirement {} of {} not found, skipping",
                    required,
                    module.name()
                ),
            }
        }
        Ok(requirements)
    }

    /// Transitive requirements in load order, the module itself last
    ///
    /// Fails with `CircularDependency` when the chain loops.
    pub fn resolve_load_order(&self, name: &str) -> Result<Vec<Module>> {
        let all = self.all()?;
        if all.find(name).is_none() {
            return Err(Error::module_not_found(name));
        }

        let order = DependencyResolver::new(&all).resolve(name)?;
        Ok(order
            .iter()
            .filter_map(|n| all.find(n).cloned())
            .collect())
    }

    /// Declared requirements that match no discovered module
    pub fn missing_requirements(&self, name: &str) -> Result<Vec<String>> {
        let all = self.all()?;
        let module = all
            .find(name)
            .ok_or_else(|| Error::module_not_found(name))?;

        let available: HashSet<String> = all.iter().map(Module::lower_name).collect();
        let missing = DependencyResolver::new(&all).missing(module.name(), &available);
        Ok(module
            .requires()
            .iter()
            .filter(|r| missing.contains(&naming::lower(r)))
            .cloned()
            .collect())
    }

    /// Root directory module assets are published to
    pub fn assets_path(&self) -> &Path {
        &self.assets_path
    }

    /// Published asset directory of one module
    pub fn asset_path(&self, module: &str) -> PathBuf {
        self.assets_path.join(naming::lower(module))
    }

    /// Public URL of a `module:path` asset reference
    pub fn asset(&self, reference: &str) -> Result<String> {
        let (module, path) = reference
            .split_once(':')
            .filter(|(module, _)| !module.trim().is_empty())
            .ok_or_else(|| Error::missing_module_name(reference))?;

        Ok(format!(
            "{}/{}/{}",
            self.assets_url.trim_end_matches('/'),
            naming::lower(module.trim()),
            path.trim_start_matches('/')
        ))
    }

    pub fn enable(&self, name: &str) -> Result<()> {
        self.find_or_fail(name)?.enable()
    }

    pub fn disable(&self, name: &str) -> Result<()> {
        self.find_or_fail(name)?.disable()
    }

    pub fn set_active(&self, name: &str, active: bool) -> Result<()> {
        self.find_or_fail(name)?.set_active(active)
    }

    pub fn is_enabled(&self, name: &str) -> Result<bool> {
        self.find_or_fail(name)?.is_enabled()
    }

    pub fn is_disabled(&self, name: &str) -> Result<bool> {
        self.find_or_fail(name)?.is_disabled()
    }

    /// Delete a module's directory and its activation record
    pub fn delete(&self, name: &str) -> Result<()> {
        let module = self.find_or_fail(name)?;
        module.delete()?;
        self.activator.delete(&module)?;
        self.activator
            .notify(&ModuleEvent::new(ModuleEventKind::Deleted, module.name()));
        Ok(())
    }

    /// Where a module lives, or where it would be generated
    ///
    /// Falls back to `<first location>/<StudlyName>` for unknown modules.
    pub fn module_path(&self, name: &str) -> Result<PathBuf> {
        if let Some(module) = self.find(name)? {
            return Ok(module.path().to_path_buf());
        }
        self.paths
            .first()
            .map(|root| root.join(naming::studly(name)))
            .ok_or_else(|| Error::invalid_config("no module locations registered"))
    }

    /// Marker file holding the most recently used module
    pub fn used_storage_path(&self) -> &Path {
        &self.used_storage_path
    }

    /// Remember `name` as the module in use
    pub fn set_used(&self, name: &str) -> Result<()> {
        let module = self.find_or_fail(name)?;
        if let Some(parent) = self.used_storage_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.used_storage_path, module.name())?;
        info!("Using module {}", module.name());
        Ok(())
    }

    /// Module name stored by [`set_used`](Self::set_used), if any
    pub fn get_used_now(&self) -> Result<Option<String>> {
        if !self.used_storage_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.used_storage_path)?;
        let name = content.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    /// Forget the module in use
    pub fn forget_used(&self) -> Result<()> {
        if self.used_storage_path.exists() {
            fs::remove_file(&self.used_storage_path)?;
        }
        Ok(())
    }
}
