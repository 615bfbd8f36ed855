use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a file inside a repro bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    Video,
    Log,
    Screenshot,
    CrashDump,
    Thumbnail,
    Other,
}

impl ArtifactType {
    /// Normalize a manifest type label to an artifact type.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "video" => ArtifactType::Video,
            "log" => ArtifactType::Log,
            "screenshot" => ArtifactType::Screenshot,
            "crash_dump" | "crashdump" | "dump" => ArtifactType::CrashDump,
            "thumbnail" | "thumb" => ArtifactType::Thumbnail,
            _ => ArtifactType::Other,
        }
    }

    /// Infer the artifact type from a filename.
    pub fn guess_from_filename(filename: &str) -> Self {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".mp4") || lower.ends_with(".webm") {
            ArtifactType::Video
        } else if lower.ends_with(".txt") || lower.ends_with(".log") {
            ArtifactType::Log
        } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") || lower.ends_with(".png") {
            if lower.contains("thumbnail") {
                ArtifactType::Thumbnail
            } else {
                ArtifactType::Screenshot
            }
        } else if lower.ends_with(".dmp") {
            ArtifactType::CrashDump
        } else {
            ArtifactType::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactType::Video => "video",
            ArtifactType::Log => "log",
            ArtifactType::Screenshot => "screenshot",
            ArtifactType::CrashDump => "crash_dump",
            ArtifactType::Thumbnail => "thumbnail",
            ArtifactType::Other => "other",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capture platform recorded in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Win64,
    Linux,
    Mac,
    Android,
    #[serde(rename = "iOS")]
    Ios,
    Other,
}

impl Platform {
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "win64" | "windows" => Platform::Win64,
            "linux" => Platform::Linux,
            "mac" | "macos" => Platform::Mac,
            "android" => Platform::Android,
            "ios" => Platform::Ios,
            _ => Platform::Other,
        }
    }
}

/// Infer a MIME type from a filename.
pub fn guess_mime_type(filename: &str) -> Option<&'static str> {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".mp4") {
        Some("video/mp4")
    } else if lower.ends_with(".webm") {
        Some("video/webm")
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        Some("image/jpeg")
    } else if lower.ends_with(".png") {
        Some("image/png")
    } else if lower.ends_with(".json") {
        Some("application/json")
    } else if lower.ends_with(".txt") || lower.ends_with(".log") {
        Some("text/plain")
    } else {
        None
    }
}

/// One artifact declared by the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestArtifact {
    pub filename: String,
    #[serde(rename = "type", default)]
    pub artifact_type: Option<ArtifactType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// SHA-256 hex digest of the artifact file, when the capture recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl ManifestArtifact {
    /// Effective artifact type: the declared one, or a guess from the filename.
    pub fn effective_type(&self) -> ArtifactType {
        self.artifact_type
            .unwrap_or_else(|| ArtifactType::guess_from_filename(&self.filename))
    }
}

/// Manifest artifact lists come in two historical shapes: bare filenames or
/// full artifact objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestArtifactEntry {
    Name(String),
    Detailed(ManifestArtifact),
}

impl ManifestArtifactEntry {
    /// Resolve to a full artifact record, guessing type and MIME for bare
    /// filename entries.
    pub fn resolve(&self) -> ManifestArtifact {
        match self {
            ManifestArtifactEntry::Name(filename) => ManifestArtifact {
                filename: filename.clone(),
                artifact_type: Some(ArtifactType::guess_from_filename(filename)),
                mime_type: guess_mime_type(filename).map(str::to_string),
                size_bytes: None,
                checksum: None,
            },
            ManifestArtifactEntry::Detailed(artifact) => artifact.clone(),
        }
    }
}

/// Build information captured at record time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(default)]
    pub build_id: String,
    #[serde(default)]
    pub commit_hash: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub build_config: String,
    #[serde(default)]
    pub engine_version: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_version: String,
}

/// Session information captured at record time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub map_name: String,
    #[serde(default)]
    pub game_mode_name: String,
    #[serde(default)]
    pub tester_name: String,
    #[serde(default)]
    pub test_case_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_fps: Option<f64>,
}

/// Hardware information captured at record time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareInfo {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub cpu_brand: String,
    #[serde(default)]
    pub gpu_brand: String,
    #[serde(default)]
    pub device_id: String,
}

/// Parsed `manifest.json` of a repro bundle.
///
/// Every field is optional in the wild; accessors supply the fallbacks the
/// rest of the system relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub bundle_id: String,
    #[serde(default)]
    pub content_hash: String,
    /// Unix milliseconds at which the report was captured.
    #[serde(default)]
    pub report_timestamp_utc: i64,
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default)]
    pub total_frames: u64,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_info: Option<BuildInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_info: Option<SessionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_info: Option<HardwareInfo>,
    #[serde(default)]
    pub artifacts: Vec<ManifestArtifactEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Manifest {
    /// Recorded capture time, when the manifest carries one.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if self.report_timestamp_utc > 0 {
            Utc.timestamp_millis_opt(self.report_timestamp_utc).single()
        } else {
            None
        }
    }

    /// Build identifier, falling back to the bundle id.
    pub fn build_id(&self) -> &str {
        if let Some(info) = &self.build_info
            && !info.build_id.is_empty()
        {
            return &info.build_id;
        }
        &self.bundle_id
    }

    pub fn map_name(&self) -> &str {
        self.session_info
            .as_ref()
            .map(|s| s.map_name.as_str())
            .unwrap_or("")
    }

    pub fn platform(&self) -> Platform {
        self.hardware_info
            .as_ref()
            .map(|h| Platform::from_label(&h.platform))
            .unwrap_or(Platform::Other)
    }

    /// Authoritative session duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration_seconds * 1000.0
    }

    /// All declared artifacts, resolved to full records.
    pub fn resolved_artifacts(&self) -> Vec<ManifestArtifact> {
        self.artifacts.iter().map(|a| a.resolve()).collect()
    }
}
