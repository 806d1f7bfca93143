//! Error types for modkit-core

use thiserror::Error;

/// Result type alias using modkit-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for modkit
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest file unreadable or not well-formed
    #[error("Error processing file: {path}. Error: {detail}")]
    InvalidManifest { path: String, detail: String },

    /// Lookup miss on a module the caller asserted must exist
    #[error("Module [{name}] does not exist!")]
    ModuleNotFound { name: String },

    /// Activation backend misconfigured
    #[error("Invalid activator configuration: {message}")]
    InvalidActivatorConfiguration { message: String },

    /// Asset reference without its `module:` qualifier
    #[error("Module name was not specified in asset [{asset}].")]
    MissingModuleName { asset: String },

    /// No macro registered under the requested name
    #[error("Method [{name}] does not exist on module.")]
    MacroNotFound { name: String },

    /// Circular dependency between modules
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid manifest error
    pub fn invalid_manifest(path: impl Into<String>, detail: impl ToString) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            detail: detail.to_string(),
        }
    }

    /// Create a module not found error
    pub fn module_not_found(name: impl Into<String>) -> Self {
        Self::ModuleNotFound { name: name.into() }
    }

    /// Create an invalid activator configuration error
    pub fn invalid_activator(message: impl Into<String>) -> Self {
        Self::InvalidActivatorConfiguration {
            message: message.into(),
        }
    }

    /// Create a missing module name error
    pub fn missing_module_name(asset: impl Into<String>) -> Self {
        Self::MissingModuleName {
            asset: asset.into(),
        }
    }

    /// Create a macro not found error
    pub fn macro_not_found(name: impl Into<String>) -> Self {
        Self::MacroNotFound { name: name.into() }
    }

    /// Create a circular dependency error
    pub fn circular_dependency(cycle: impl Into<String>) -> Self {
        Self::CircularDependency {
            cycle: cycle.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error means a requested module is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ModuleNotFound { .. })
    }
}
