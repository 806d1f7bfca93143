//! Configuration loading and management

mod loader;

pub use loader::{ModulesConfig, ENV_ACTIVATOR, ENV_DEFAULT_STATUS, ENV_MODULES_PATH};
