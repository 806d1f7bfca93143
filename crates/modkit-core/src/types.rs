//! Type definitions for the modules.yaml configuration file

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parsed `modules.yaml` after merging with the embedded defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulesConfigFile {
    /// Manifest file name inside each module directory
    pub manifest: String,

    /// Filesystem locations
    pub paths: PathsConfig,

    /// Additional scan roots
    pub scan: ScanConfig,

    /// Public URL prefix for module assets
    pub assets_url: String,

    /// Name of the activator entry to use (key into `activators`)
    pub activator: String,

    /// Configured activator backends
    pub activators: BTreeMap<String, ActivatorSettings>,

    /// Status reported for modules without an activation record
    pub default_status: bool,
}

/// Filesystem locations, relative paths resolve against the project root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub modules: Utf8PathBuf,
    pub assets: Utf8PathBuf,
    pub used: Utf8PathBuf,
}

/// Extra scan roots beyond `paths.modules`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub enabled: bool,
    #[serde(default)]
    pub paths: Vec<Utf8PathBuf>,
    /// Submodule-aware scanning
    #[serde(default)]
    pub recursive: bool,
}

/// One entry under `activators`
///
/// The driver stays a plain string here; it is validated when the
/// activation store is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivatorSettings {
    pub driver: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses_file: Option<Utf8PathBuf>,
}
