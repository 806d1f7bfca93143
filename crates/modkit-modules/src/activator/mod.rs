//! Activation state for modules
//!
//! Whether a module is enabled lives outside the module itself, in a
//! pluggable [`Activator`] backend:
//! - [`FileActivator`]: one JSON status file for all modules
//! - [`ManifestActivator`]: an `active` flag inside each module's manifest
//!
//! [`ActivationStore`] wraps the selected backend with the configured default
//! status and the lifecycle event sink.

mod file;
mod manifest;

pub use file::FileActivator;
pub use manifest::ManifestActivator;

use crate::events::{EventSink, ModuleEvent, ModuleEventKind};
use crate::module::Module;
use modkit_core::{Error, ModulesConfig, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Persistence backend for enabled/disabled flags
pub trait Activator: Send + Sync {
    /// Stored status, `None` when nothing was ever written for the module
    fn status(&self, module: &Module) -> Result<Option<bool>>;

    /// Persist a status immediately
    fn set_status(&self, module: &Module, active: bool) -> Result<()>;

    /// Drop the stored status for one module
    fn forget(&self, module: &Module) -> Result<()>;

    /// Drop every stored status
    fn reset(&self) -> Result<()>;

    fn driver(&self) -> ActivatorDriver;
}

/// Backend kinds selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivatorDriver {
    File,
    Manifest,
}

impl ActivatorDriver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Manifest => "manifest",
        }
    }
}

impl fmt::Display for ActivatorDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivatorDriver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "manifest" => Ok(Self::Manifest),
            other => Err(Error::invalid_activator(format!(
                "unknown activator driver [{}], expected one of: file, manifest",
                other
            ))),
        }
    }
}

/// Activation status lookups and changes for modules
pub struct ActivationStore {
    backend: Box<dyn Activator>,
    default_status: bool,
    sink: Arc<dyn EventSink>,
}

impl ActivationStore {
    pub fn new(
        backend: Box<dyn Activator>,
        default_status: bool,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            backend,
            default_status,
            sink,
        }
    }

    /// Resolve the configured backend
    ///
    /// All configuration problems surface here, before any module operation
    /// touches the filesystem.
    pub fn from_config(config: &ModulesConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let name = config.activator_name();
        let settings = config.activator_settings().ok_or_else(|| {
            Error::invalid_activator(format!("activator [{}] is not configured", name))
        })?;

        let driver: ActivatorDriver = settings.driver.parse()?;
        let backend: Box<dyn Activator> = match driver {
            ActivatorDriver::File => {
                let statuses_file = settings
                    .statuses_file
                    .as_ref()
                    .filter(|p| !p.as_str().trim().is_empty())
                    .ok_or_else(|| {
                        Error::invalid_activator(format!(
                            "activator [{}] uses the file driver but has no statuses_file",
                            name
                        ))
                    })?;
                Box::new(FileActivator::new(
                    config.resolve(statuses_file).into_std_path_buf(),
                ))
            }
            ActivatorDriver::Manifest => Box::new(ManifestActivator::new(
                config.manifest_name(),
                config
                    .scan_paths()
                    .into_iter()
                    .map(|p| p.into_std_path_buf())
                    .collect(),
                config.recursive_scan(),
            )),
        };

        debug!("Resolved activator [{}] with driver {}", name, driver);
        Ok(Self::new(backend, config.default_status(), sink))
    }

    /// Effective status: the stored one, or the default when absent
    pub fn status(&self, module: &Module) -> Result<bool> {
        Ok(self
            .backend
            .status(module)?
            .unwrap_or(self.default_status))
    }

    /// Whether the effective status equals `expected`
    pub fn has_status(&self, module: &Module, expected: bool) -> Result<bool> {
        Ok(self.status(module)? == expected)
    }

    /// Enable a module, emitting `enabling` before and `enabled` after
    pub fn enable(&self, module: &Module) -> Result<()> {
        self.change(module, true)
    }

    /// Disable a module, emitting `disabling` before and `disabled` after
    pub fn disable(&self, module: &Module) -> Result<()> {
        self.change(module, false)
    }

    fn change(&self, module: &Module, active: bool) -> Result<()> {
        let (before, after) = if active {
            (ModuleEventKind::Enabling, ModuleEventKind::Enabled)
        } else {
            (ModuleEventKind::Disabling, ModuleEventKind::Disabled)
        };

        self.notify(&ModuleEvent::new(before, module.name()));
        self.backend.set_status(module, active)?;
        info!("Module {} {}", module.name(), after);
        self.notify(&ModuleEvent::new(after, module.name()));
        Ok(())
    }

    /// Set a status without lifecycle notifications
    pub fn set_active(&self, module: &Module, active: bool) -> Result<()> {
        debug!("Setting {} active={}", module.name(), active);
        self.backend.set_status(module, active)
    }

    /// Remove the stored status of a module
    pub fn delete(&self, module: &Module) -> Result<()> {
        self.backend.forget(module)
    }

    /// Return to the never-written state
    pub fn reset(&self) -> Result<()> {
        self.backend.reset()
    }

    /// Forward an event to the sink
    pub fn notify(&self, event: &ModuleEvent) {
        self.sink.dispatch(event);
    }

    pub fn default_status(&self) -> bool {
        self.default_status
    }

    pub fn driver(&self) -> ActivatorDriver {
        self.backend.driver()
    }
}

impl fmt::Debug for ActivationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationStore")
            .field("driver", &self.backend.driver())
            .field("default_status", &self.default_status)
            .finish()
    }
}

/// Interpret a stored flag: booleans, or numbers where non-zero means active
pub(crate) fn flag(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        serde_json::Value::String(s) => match s.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
