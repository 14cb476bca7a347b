//! Configuration for Cinder scans.
//!
//! Loads [`ScannerConfig`] from the environment, an explicit file or the
//! working directory, and turns it into the core's scan options and parser.
//! The `cinder-scan` binary is built on top of this crate.

#![allow(missing_docs)]

pub mod models;

pub use models::scanner::{CONFIG_JSON_ENV, CONFIG_PATH_ENV};
pub use models::{ContentType, ScannerConfig, ScannerConfigSource};
