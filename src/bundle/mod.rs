//! Local repro-bundle data source: directory reader and consistency
//! validation.
//!
//! This is the edge of the system, the one place allowed to fail. Core
//! normalization never errors; absent artifacts simply come back as `None`.

pub mod reader;
pub mod validate;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("bundle has no manifest.json under {path}")]
    MissingManifest { path: PathBuf },

    #[error("failed to read {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub use reader::BundleDir;
pub use validate::{BundleStats, ValidationIssue, ValidationReport, validate_bundle};
