//! Test fixture utilities
//!
//! Every fixture lives in its own temporary directory:
//!
//! ```text
//! <root>/
//!   modules/<Dir>/module.json
//!   modules_statuses.json
//!   storage/app/modules/modules.used
//! ```

#![allow(dead_code)]

use super::builders::ManifestBuilder;
use super::constants::*;
use anyhow::{Context, Result};
use modkit_modules::{
    ActivationStore, EventSink, FileActivator, ManifestActivator, ModuleRepository, RecordingSink,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Temp-dir backed module tree
pub struct ModulesFixture {
    temp_dir: TempDir,
    sink: Arc<RecordingSink>,
}

impl ModulesFixture {
    /// Empty fixture: no modules written yet
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp directory")?;
        std::fs::create_dir_all(temp_dir.path().join("modules"))
            .context("Failed to create modules directory")?;
        Ok(Self {
            temp_dir,
            sink: Arc::new(RecordingSink::new()),
        })
    }

    /// Fixture holding the three standard modules
    ///
    /// - `Recipe` requires `required_module`
    /// - `required_module` lives in `Requirement/`
    /// - `Order` has order 1
    pub fn valid() -> Result<Self> {
        let fixture = Self::new()?;
        fixture.write_module(
            RECIPE,
            &ManifestBuilder::new(RECIPE)
                .requires(REQUIREMENT)
                .with_provider("Modules\\Recipe\\Providers\\RecipeServiceProvider")
                .build(),
        )?;
        fixture.write_module(
            REQUIREMENT_DIR,
            &ManifestBuilder::new(REQUIREMENT)
                .with_description("required module")
                .build(),
        )?;
        fixture.write_module(ORDER, &ManifestBuilder::new(ORDER).with_order(1).build())?;
        Ok(fixture)
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.root().join("modules")
    }

    pub fn statuses_file(&self) -> PathBuf {
        self.root().join(STATUSES_FILE)
    }

    pub fn used_file(&self) -> PathBuf {
        self.root().join(USED_FILE)
    }

    pub fn sink(&self) -> &Arc<RecordingSink> {
        &self.sink
    }

    fn dyn_sink(&self) -> Arc<dyn EventSink> {
        self.sink.clone()
    }

    /// Write `manifest` to `modules/<dir>/module.json`
    pub fn write_module(&self, dir: &str, manifest: &Value) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(manifest)?;
        self.write_raw(dir, &content)
    }

    /// Write arbitrary manifest text to `modules/<dir>/module.json`
    pub fn write_raw(&self, dir: &str, content: &str) -> Result<PathBuf> {
        let module_dir = self.modules_dir().join(dir);
        std::fs::create_dir_all(&module_dir)
            .with_context(|| format!("Failed to create {}", module_dir.display()))?;
        std::fs::write(module_dir.join(MANIFEST), content)?;
        Ok(module_dir)
    }

    /// Store backed by the statuses file, default status disabled
    pub fn file_store(&self) -> Arc<ActivationStore> {
        Arc::new(ActivationStore::new(
            Box::new(FileActivator::new(self.statuses_file())),
            false,
            self.dyn_sink(),
        ))
    }

    /// Store backed by manifest flags, default status disabled
    pub fn manifest_store(&self) -> Arc<ActivationStore> {
        Arc::new(ActivationStore::new(
            Box::new(ManifestActivator::new(
                MANIFEST,
                vec![self.modules_dir()],
                false,
            )),
            false,
            self.dyn_sink(),
        ))
    }

    pub fn repository(&self) -> ModuleRepository {
        self.repository_with(self.file_store())
    }

    pub fn repository_with(&self, store: Arc<ActivationStore>) -> ModuleRepository {
        let mut repository = ModuleRepository::new(store)
            .with_manifest_name(MANIFEST)
            .with_assets(self.root().join("public/modules"), "/modules")
            .with_used_storage_path(self.used_file());
        repository.add_location(self.modules_dir());
        repository
    }

    /// Current statuses file content, `None` when never written
    pub fn statuses_content(&self) -> Option<String> {
        std::fs::read_to_string(self.statuses_file()).ok()
    }
}
