//! Status file backend
//!
//! All statuses live in one JSON object keyed by module name:
//!
//! ```json
//! {
//!     "Recipe": true,
//!     "Blog": false
//! }
//! ```
//!
//! The file is created on first write. Each write takes an exclusive lock,
//! re-reads the document, applies the change and rewrites it whole.

use super::{flag, Activator, ActivatorDriver};
use crate::manifest::to_pretty_json;
use crate::module::Module;
use fs4::fs_std::FileExt;
use modkit_core::{Error, Result};
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Activator persisting statuses to a single JSON file
#[derive(Debug, Clone)]
pub struct FileActivator {
    statuses_file: PathBuf,
}

impl FileActivator {
    pub fn new(statuses_file: impl Into<PathBuf>) -> Self {
        Self {
            statuses_file: statuses_file.into(),
        }
    }

    pub fn statuses_file(&self) -> &Path {
        &self.statuses_file
    }

    /// Every stored status, in file order
    pub fn statuses(&self) -> Result<Map<String, Value>> {
        if !self.statuses_file.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.statuses_file)?;
        self.parse(&content)
    }

    fn parse(&self, content: &str) -> Result<Map<String, Value>> {
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(Error::invalid_config(format!(
                "statuses file {} must contain a JSON object",
                self.statuses_file.display()
            ))),
            Err(e) => Err(Error::invalid_config(format!(
                "statuses file {} is not valid JSON: {}",
                self.statuses_file.display(),
                e
            ))),
        }
    }

    /// Read-modify-write under an exclusive lock
    fn modify<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        if let Some(parent) = self.statuses_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.statuses_file)?;

        // Released when `file` is dropped
        file.lock_exclusive()?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        let mut statuses = self.parse(&content)?;

        apply(&mut statuses);

        let mut rendered = to_pretty_json(&statuses)?;
        rendered.push('\n');

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(rendered.as_bytes())?;
        file.sync_all()?;

        debug!(
            "Wrote {} statuses to {}",
            statuses.len(),
            self.statuses_file.display()
        );
        Ok(())
    }
}

impl Activator for FileActivator {
    fn status(&self, module: &Module) -> Result<Option<bool>> {
        let statuses = self.statuses()?;
        Ok(statuses.get(module.name()).and_then(|value| {
            let parsed = flag(value);
            if parsed.is_none() {
                warn!("Ignoring unreadable status for {}: {}", module.name(), value);
            }
            parsed
        }))
    }

    fn set_status(&self, module: &Module, active: bool) -> Result<()> {
        let name = module.name().to_string();
        self.modify(move |statuses| {
            statuses.insert(name, Value::Bool(active));
        })
    }

    fn forget(&self, module: &Module) -> Result<()> {
        if !self.statuses_file.exists() {
            return Ok(());
        }
        let name = module.name();
        self.modify(|statuses| {
            statuses.shift_remove(name);
        })
    }

    fn reset(&self) -> Result<()> {
        if self.statuses_file.exists() {
            fs::remove_file(&self.statuses_file)?;
            debug!("Removed statuses file {}", self.statuses_file.display());
        }
        Ok(())
    }

    fn driver(&self) -> ActivatorDriver {
        ActivatorDriver::File
    }
}
