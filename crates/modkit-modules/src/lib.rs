//! Module management for modkit
//!
//! This crate handles:
//! - Manifest reading and writing
//! - Activation state persistence (status file or manifest flags)
//! - Module entities and lifecycle events
//! - Repository scanning, lookups and requirement resolution

pub mod activator;
pub mod collection;
pub mod dependency;
pub mod events;
pub mod manifest;
pub mod module;
pub mod repository;
pub mod scanner;

pub use activator::{ActivationStore, Activator, ActivatorDriver, FileActivator, ManifestActivator};
pub use collection::ModuleCollection;
pub use dependency::DependencyResolver;
pub use events::{EventSink, ModuleEvent, ModuleEventKind, RecordingSink, TracingSink};
pub use manifest::{ManifestDocument, ModuleManifest, DEFAULT_MANIFEST};
pub use module::{Macro, Module};
pub use repository::ModuleRepository;
