//! Configuration file loading and parsing
//!
//! Precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Project config (`modules.yaml`, found explicitly or by walking up from cwd)
//! 3. Environment variables (`MODKIT_*` prefix)

use crate::error::{Error, Result};
use crate::types::{ActivatorSettings, ModulesConfigFile};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// Configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["modules.yaml", "modules.yml"];

/// Embedded defaults file
const DEFAULTS_FILE: &str = "modules.yaml";

/// Environment variable overriding `activator`
pub const ENV_ACTIVATOR: &str = "MODKIT_ACTIVATOR";

/// Environment variable overriding `paths.modules`
pub const ENV_MODULES_PATH: &str = "MODKIT_MODULES_PATH";

/// Environment variable overriding `default_status`
pub const ENV_DEFAULT_STATUS: &str = "MODKIT_DEFAULT_STATUS";

/// Loaded module configuration
#[derive(Debug, Clone)]
pub struct ModulesConfig {
    /// The merged configuration
    pub config: ModulesConfigFile,

    /// Path to the configuration file, if one was found
    pub config_path: Option<Utf8PathBuf>,

    /// Project root; relative paths resolve against it
    pub base_dir: Utf8PathBuf,
}

impl ModulesConfig {
    /// Load configuration from the specified path or search for it
    ///
    /// An explicit path must exist. Without one, the current directory and
    /// its parents are searched; when nothing is found the embedded defaults
    /// are used with the current directory as project root.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let found = match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        Error::config_not_found(p.as_str())
                    } else {
                        Error::Io(e)
                    }
                })?;
                Some((p.to_owned(), content))
            }
            None => Self::find_config()?,
        };

        let config = match found {
            Some((config_path, content)) => {
                let base_dir = config_path
                    .parent()
                    .filter(|p| !p.as_str().is_empty())
                    .map(|p| p.to_owned())
                    .unwrap_or_else(|| Utf8PathBuf::from("."));
                debug!("Loading module configuration from {}", config_path);
                let mut config = Self::from_yaml_str(&content, base_dir)?;
                config.config_path = Some(config_path);
                config
            }
            None => {
                debug!("No modules.yaml found, using embedded defaults");
                Self::with_defaults(Self::current_dir()?)?
            }
        };

        config.apply_env_overrides()
    }

    /// Build configuration from YAML text layered over the embedded defaults
    pub fn from_yaml_str(content: &str, base_dir: impl Into<Utf8PathBuf>) -> Result<Self> {
        let mut merged = Self::embedded_defaults()?;
        let overlay: Value = serde_yaml_ng::from_str(content)?;
        merge_values(&mut merged, overlay);

        let config: ModulesConfigFile = serde_yaml_ng::from_value(merged)
            .map_err(|e| Error::invalid_config(format!("Failed to parse modules.yaml: {}", e)))?;

        Ok(Self {
            config,
            config_path: None,
            base_dir: base_dir.into(),
        })
    }

    /// Embedded defaults rooted at `base_dir`
    pub fn with_defaults(base_dir: impl Into<Utf8PathBuf>) -> Result<Self> {
        let config: ModulesConfigFile = serde_yaml_ng::from_value(Self::embedded_defaults()?)
            .map_err(|e| Error::invalid_config(format!("Invalid embedded defaults: {}", e)))?;

        Ok(Self {
            config,
            config_path: None,
            base_dir: base_dir.into(),
        })
    }

    /// Load the embedded defaults file as a YAML tree
    fn embedded_defaults() -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Find configuration file in current directory or parent directories
    fn find_config() -> Result<Option<(Utf8PathBuf, String)>> {
        let cwd = Self::current_dir()?;
        let mut current = cwd.as_path();

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let content = fs::read_to_string(&path)?;
                    return Ok(Some((path, content)));
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return Ok(None),
            }
        }
    }

    fn current_dir() -> Result<Utf8PathBuf> {
        let cwd = env::current_dir().map_err(Error::Io)?;
        Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))
    }

    /// Apply `MODKIT_*` environment variable overrides
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(activator) = env::var(ENV_ACTIVATOR) {
            debug!("{} overrides activator: {}", ENV_ACTIVATOR, activator);
            self.config.activator = activator;
        }

        if let Ok(path) = env::var(ENV_MODULES_PATH) {
            debug!("{} overrides modules path: {}", ENV_MODULES_PATH, path);
            self.config.paths.modules = Utf8PathBuf::from(path);
        }

        if let Ok(status) = env::var(ENV_DEFAULT_STATUS) {
            self.config.default_status = parse_bool(&status).ok_or_else(|| {
                Error::invalid_config(format!(
                    "{} must be true/false or 1/0, got '{}'",
                    ENV_DEFAULT_STATUS, status
                ))
            })?;
        }

        Ok(self)
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Primary modules location
    pub fn modules_path(&self) -> Utf8PathBuf {
        self.resolve(&self.config.paths.modules)
    }

    /// Public assets root
    pub fn assets_path(&self) -> Utf8PathBuf {
        self.resolve(&self.config.paths.assets)
    }

    /// Used-module marker file
    pub fn used_storage_path(&self) -> Utf8PathBuf {
        self.resolve(&self.config.paths.used)
    }

    /// All scan roots: the modules path, then any enabled extra scan paths
    pub fn scan_paths(&self) -> Vec<Utf8PathBuf> {
        let mut paths = vec![self.modules_path()];
        if self.config.scan.enabled {
            paths.extend(self.config.scan.paths.iter().map(|p| self.resolve(p)));
        }
        paths
    }

    /// Manifest file name
    pub fn manifest_name(&self) -> &str {
        &self.config.manifest
    }

    /// Whether submodule-aware scanning is on
    pub fn recursive_scan(&self) -> bool {
        self.config.scan.recursive
    }

    /// Name of the selected activator entry
    pub fn activator_name(&self) -> &str {
        &self.config.activator
    }

    /// Settings of the selected activator, if configured
    pub fn activator_settings(&self) -> Option<&ActivatorSettings> {
        self.config.activators.get(&self.config.activator)
    }

    /// Default status for modules without a record
    pub fn default_status(&self) -> bool {
        self.config.default_status
    }

    /// Public URL prefix for assets
    pub fn assets_url(&self) -> &str {
        &self.config.assets_url
    }
}

/// Deep-merge `overlay` into `base`; mappings merge key by key, null leaves
/// `base` untouched, anything else replaces it.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
