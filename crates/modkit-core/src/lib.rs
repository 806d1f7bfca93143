//! # modkit-core
//!
//! Core library for modkit providing:
//! - The error taxonomy shared by every modkit crate
//! - Configuration file parsing (modules.yaml) layered over embedded defaults
//! - Name transforms (lower, StudlyCase, snake_case)

pub mod config;
pub mod error;
pub mod naming;
pub mod types;

pub use config::ModulesConfig;
pub use error::{Error, Result};
