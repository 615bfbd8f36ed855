//! Reading a repro bundle from a local directory.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::bundle::BundleError;
use crate::ingest::{RawFramePayload, RawInputPayload};
use crate::model::{ArtifactType, Manifest, ManifestArtifact};

pub const MANIFEST_FILENAME: &str = "manifest.json";
pub const INPUTS_FILENAME: &str = "inputs.json";
pub const TIMING_FILENAME: &str = "timing.json";
pub const LOGS_FILENAME: &str = "logs.txt";

/// An opened bundle directory with its parsed manifest.
///
/// Artifact lookup follows the manifest first and falls back to the
/// conventional filenames on disk, so bundles with sparse manifests still
/// load.
#[derive(Debug)]
pub struct BundleDir {
    root: PathBuf,
    manifest: Manifest,
}

impl BundleDir {
    /// Open a bundle directory by parsing its `manifest.json`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BundleError> {
        let root = path.into();
        let manifest_path = root.join(MANIFEST_FILENAME);
        if !manifest_path.is_file() {
            return Err(BundleError::MissingManifest { path: root });
        }
        let text = fs::read_to_string(&manifest_path).map_err(|source| BundleError::FileRead {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest = serde_json::from_str(&text).map_err(|source| BundleError::Parse {
            path: manifest_path,
            source,
        })?;
        debug!(root = %root.display(), "opened bundle");
        Ok(Self { root, manifest })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn artifact_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    fn find_artifact(
        &self,
        pick: impl Fn(&ManifestArtifact) -> bool,
    ) -> Option<ManifestArtifact> {
        self.manifest.resolved_artifacts().into_iter().find(pick)
    }

    /// Locate the artifact file for a data type: manifest entry first, then
    /// the conventional filename on disk.
    fn locate(
        &self,
        pick: impl Fn(&ManifestArtifact) -> bool,
        conventional: &str,
    ) -> Option<PathBuf> {
        if let Some(artifact) = self.find_artifact(pick) {
            let path = self.artifact_path(&artifact.filename);
            if path.is_file() {
                return Some(path);
            }
        }
        let fallback = self.artifact_path(conventional);
        fallback.is_file().then_some(fallback)
    }

    /// The input-event artifact: `inputs.json`, or any non-video artifact
    /// whose name mentions inputs.
    pub fn inputs_path(&self) -> Option<PathBuf> {
        self.locate(
            |a| {
                a.filename == INPUTS_FILENAME
                    || (a.effective_type() == ArtifactType::Other
                        && a.filename.contains("input"))
            },
            INPUTS_FILENAME,
        )
    }

    pub fn timing_path(&self) -> Option<PathBuf> {
        self.locate(|a| a.filename == TIMING_FILENAME, TIMING_FILENAME)
    }

    /// The engine-log artifact: `logs.txt`, or any artifact typed as a log.
    pub fn logs_path(&self) -> Option<PathBuf> {
        self.locate(
            |a| a.filename == LOGS_FILENAME || a.effective_type() == ArtifactType::Log,
            LOGS_FILENAME,
        )
    }

    pub fn video_artifact(&self) -> Option<ManifestArtifact> {
        self.find_artifact(|a| a.effective_type() == ArtifactType::Video)
    }

    /// Raw input payload, or `None` when the bundle has no input artifact.
    pub fn read_inputs(&self) -> Result<Option<RawInputPayload>, BundleError> {
        let Some(path) = self.inputs_path() else {
            return Ok(None);
        };
        let text = read_file(&path)?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| BundleError::Parse { path, source })
    }

    /// Raw frame-timing payload, or `None` when the bundle has no timing
    /// artifact.
    pub fn read_frames(&self) -> Result<Option<RawFramePayload>, BundleError> {
        let Some(path) = self.timing_path() else {
            return Ok(None);
        };
        let text = read_file(&path)?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| BundleError::Parse { path, source })
    }

    /// Raw newline-delimited log text, or `None` when the bundle has no log
    /// artifact.
    pub fn read_log_text(&self) -> Result<Option<String>, BundleError> {
        match self.logs_path() {
            Some(path) => read_file(&path).map(Some),
            None => Ok(None),
        }
    }
}

fn read_file(path: &Path) -> Result<String, BundleError> {
    fs::read_to_string(path).map_err(|source| BundleError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// SHA-256 hex digest of a file, for manifest checksum verification.
pub fn file_sha256_hex(path: &Path) -> Result<String, BundleError> {
    let mut file = fs::File::open(path).map_err(|source| BundleError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|source| BundleError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
