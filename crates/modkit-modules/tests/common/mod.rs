//! Common test utilities for modkit-modules
//!
//! This module provides shared test infrastructure including:
//! - Constants describing the standard fixture set
//! - Manifest builders for writing module directories
//! - A temp-dir fixture wiring stores and repositories together

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod fixtures;

pub use builders::*;
pub use constants::*;
pub use fixtures::*;
