//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod config;
pub mod headless;
pub mod memory;
pub mod ports;
pub mod snapshot_file;
