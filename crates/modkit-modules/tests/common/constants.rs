//! Test constants for modkit-modules tests

#![allow(dead_code)]

/// Manifest file name used by every fixture
pub const MANIFEST: &str = "module.json";

/// Number of modules in the valid fixture set
pub const VALID_MODULE_COUNT: usize = 3;

/// Module requiring another one
pub const RECIPE: &str = "Recipe";

/// Module named by its requirement key rather than its directory
pub const REQUIREMENT: &str = "required_module";

/// Directory holding [`REQUIREMENT`]
pub const REQUIREMENT_DIR: &str = "Requirement";

/// Module with a non-default load order
pub const ORDER: &str = "Order";

/// Statuses file name inside the fixture root
pub const STATUSES_FILE: &str = "modules_statuses.json";

/// Used-module marker, relative to the fixture root
pub const USED_FILE: &str = "storage/app/modules/modules.used";
