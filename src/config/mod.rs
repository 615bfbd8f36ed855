use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ingest::DEFAULT_TARGET_FPS;
use crate::playback::ShortcutMap;

const CONFIG_FILE: &str = "viewer.json";

/// User settings for the viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Nominal capture frame rate assumed when a bundle does not state one.
    pub target_fps: f64,
    /// Transport shortcut bindings.
    pub shortcuts: ShortcutMap,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            shortcuts: ShortcutMap::default(),
        }
    }
}

impl ViewerConfig {
    /// Load settings from disk, falling back to defaults on any problem.
    pub fn load() -> Self {
        match Self::load_from_file() {
            Ok(config) => config,
            Err(e) => {
                warn!("failed to load viewer config, using defaults: {e:#}");
                Self::default()
            }
        }
    }

    fn load_from_file() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "reproscope")
            .context("could not determine config directory")?;
        Ok(dirs.config_dir().join(CONFIG_FILE))
    }
}
