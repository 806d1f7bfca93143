//! Manifest flag backend
//!
//! Legacy layout: the status is the `active` key of each module's own
//! manifest. Existing `0`/`1` flags keep their numeric form when rewritten,
//! and a new flag is placed right after `keywords`.

use super::{flag, Activator, ActivatorDriver};
use crate::manifest::ManifestDocument;
use crate::module::Module;
use crate::scanner;
use modkit_core::Result;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

const ACTIVE_KEY: &str = "active";

/// Keys the flag is placed after, first present wins
const ACTIVE_ANCHORS: [&str; 5] = ["keywords", "version", "description", "alias", "name"];

/// Activator storing statuses inside module manifests
#[derive(Debug, Clone)]
pub struct ManifestActivator {
    manifest_name: String,
    /// Roots swept by `reset`
    roots: Vec<PathBuf>,
    recursive: bool,
}

impl ManifestActivator {
    pub fn new(manifest_name: impl Into<String>, roots: Vec<PathBuf>, recursive: bool) -> Self {
        Self {
            manifest_name: manifest_name.into(),
            roots,
            recursive,
        }
    }
}

impl Activator for ManifestActivator {
    fn status(&self, module: &Module) -> Result<Option<bool>> {
        let document = ManifestDocument::read(module.manifest_path())?;
        Ok(document.get(ACTIVE_KEY).and_then(flag))
    }

    fn set_status(&self, module: &Module, active: bool) -> Result<()> {
        let mut document = ManifestDocument::read(module.manifest_path())?;
        let value = match document.get(ACTIVE_KEY) {
            Some(Value::Number(_)) => Value::from(u8::from(active)),
            _ => Value::Bool(active),
        };
        match ACTIVE_ANCHORS
            .iter()
            .find(|anchor| document.get(anchor).is_some())
        {
            Some(anchor) => document.set_after(anchor, ACTIVE_KEY, value),
            None => document.set(ACTIVE_KEY, value),
        };
        document.save()
    }

    fn forget(&self, module: &Module) -> Result<()> {
        let path = module.manifest_path();
        if !path.exists() {
            return Ok(());
        }
        let mut document = ManifestDocument::read(path)?;
        if document.remove(ACTIVE_KEY).is_some() {
            document.save()?;
        }
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        for root in &self.roots {
            for path in scanner::discover(root, &self.manifest_name, self.recursive) {
                let mut document = ManifestDocument::read(&path)?;
                if document.remove(ACTIVE_KEY).is_some() {
                    debug!("Cleared active flag in {}", path.display());
                    document.save()?;
                }
            }
        }
        Ok(())
    }

    fn driver(&self) -> ActivatorDriver {
        ActivatorDriver::Manifest
    }
}
