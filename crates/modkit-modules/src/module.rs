//! Module entity
//!
//! A [`Module`] is one discovered module directory: its parsed manifest, its
//! absolute path, and a handle to the shared [`ActivationStore`]. The status
//! itself is never cached on the entity; every query goes to the store.

use crate::activator::ActivationStore;
use crate::manifest::{ManifestDocument, ModuleManifest};
use modkit_core::naming;
use modkit_core::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, RwLock};
use tracing::{debug, info, warn};

/// Behavior attached to every module by name, invoked with the module bound
pub type Macro = Arc<dyn Fn(&Module, &[Value]) -> Value + Send + Sync>;

static MACROS: LazyLock<RwLock<HashMap<String, Macro>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// One discovered module
#[derive(Debug, Clone)]
pub struct Module {
    manifest: ModuleManifest,
    path: PathBuf,
    manifest_name: String,
    activator: Arc<ActivationStore>,
}

impl Module {
    pub fn new(
        manifest: ModuleManifest,
        path: impl Into<PathBuf>,
        manifest_name: impl Into<String>,
        activator: Arc<ActivationStore>,
    ) -> Self {
        Self {
            manifest,
            path: path.into(),
            manifest_name: manifest_name.into(),
            activator,
        }
    }

    /// Load the module living in `dir`
    ///
    /// Relative paths are made absolute without resolving symlinks.
    pub fn load(dir: &Path, manifest_name: &str, activator: Arc<ActivationStore>) -> Result<Self> {
        let path = std::path::absolute(dir)?;
        let manifest = ModuleManifest::read(path.join(manifest_name))?;
        debug!("Loaded module {} from {}", manifest.name, path.display());
        Ok(Self::new(manifest, path, manifest_name, activator))
    }

    /// Name as written in the manifest; also the activation key
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn lower_name(&self) -> String {
        naming::lower(&self.manifest.name)
    }

    pub fn studly_name(&self) -> String {
        naming::studly(&self.manifest.name)
    }

    pub fn snake_name(&self) -> String {
        naming::snake(&self.manifest.name)
    }

    pub fn alias(&self) -> &str {
        &self.manifest.alias
    }

    pub fn description(&self) -> &str {
        &self.manifest.description
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }

    pub fn keywords(&self) -> &[String] {
        &self.manifest.keywords
    }

    /// Load priority (`order` in the manifest)
    pub fn priority(&self) -> i64 {
        self.manifest.order
    }

    /// Required module names, verbatim from the manifest
    pub fn requires(&self) -> &[String] {
        &self.manifest.requires
    }

    pub fn providers(&self) -> &[String] {
        &self.manifest.providers
    }

    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(&self.manifest_name)
    }

    /// Path of a file inside the module directory
    pub fn extra_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    /// Read a JSON file of the module; the manifest when `file` is `None`
    pub fn json(&self, file: Option<&str>) -> Result<ManifestDocument> {
        match file {
            Some(file) => ManifestDocument::read(self.path.join(file)),
            None => ManifestDocument::read(self.manifest_path()),
        }
    }

    /// Read a manifest key from disk, `default` when absent
    pub fn get(&self, key: &str, default: impl Into<Value>) -> Result<Value> {
        Ok(self.json(None)?.get_or(key, default))
    }

    /// Whether the module's activation status equals `status`
    pub fn is_status(&self, status: bool) -> Result<bool> {
        self.activator.has_status(self, status)
    }

    pub fn is_enabled(&self) -> Result<bool> {
        self.is_status(true)
    }

    pub fn is_disabled(&self) -> Result<bool> {
        self.is_status(false)
    }

    /// Enable through the store, with lifecycle notifications
    pub fn enable(&self) -> Result<()> {
        self.activator.enable(self)
    }

    /// Disable through the store, with lifecycle notifications
    pub fn disable(&self) -> Result<()> {
        self.activator.disable(self)
    }

    /// Set the status directly, without notifications
    pub fn set_active(&self, active: bool) -> Result<()> {
        self.activator.set_active(self, active)
    }

    /// Remove the activation record and the module directory
    ///
    /// Best-effort: the record goes first, so a failed directory removal
    /// leaves the files in place with the status reset to default.
    pub fn delete(&self) -> Result<()> {
        self.activator.delete(self)?;

        if self.path.exists() {
            std::fs::remove_dir_all(&self.path)?;
            info!("Deleted module {} at {}", self.name(), self.path.display());
        } else {
            warn!(
                "Module directory {} already gone, cleared status only",
                self.path.display()
            );
        }
        Ok(())
    }

    /// Register a macro available on every module
    pub fn register_macro<F>(name: impl Into<String>, callback: F)
    where
        F: Fn(&Module, &[Value]) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        debug!("Registering module macro {}", name);
        MACROS
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name, Arc::new(callback));
    }

    pub fn has_macro(name: &str) -> bool {
        MACROS
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(name)
    }

    /// Remove every registered macro
    pub fn flush_macros() {
        MACROS
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Invoke a registered macro with this module bound
    pub fn call_macro(&self, name: &str, args: &[Value]) -> Result<Value> {
        // Clone out of the lock so the macro may itself touch the registry
        let callback = MACROS
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
            .ok_or_else(|| Error::macro_not_found(name))?;
        Ok(callback(self, args))
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.studly_name())
    }
}
