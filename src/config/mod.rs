// Configuration management for cplayer
// Handles loading/saving settings, with sensible defaults when config is missing.
// Built once by main and handed down; nothing reads it from a global.

use crate::playlist::PlaylistOrder;
use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub music_directory: PathBuf,
    pub playlist: PlaylistConfig,
    pub controls: ControlsConfig,
    pub appearance: AppearanceConfig,
    pub audio: AudioSettings,
    pub development: DevelopmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    pub order: PlaylistOrder,
    /// Apply `order` when a directory is loaded.
    pub sort_on_load: bool,
    /// File extensions treated as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Seconds to seek on left/right.
    pub seek_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub footer: bool,
    /// Terminal rows taken by header, status and borders; the rest is the track window.
    pub reserved_rows: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub volume: f32, // 0.0 to 1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopmentConfig {
    pub log_dir: PathBuf,
    /// Default tracing filter, `RUST_LOG` wins when set.
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_directory: dirs::audio_dir().unwrap_or_else(|| PathBuf::from(".")),
            playlist: PlaylistConfig::default(),
            controls: ControlsConfig::default(),
            appearance: AppearanceConfig::default(),
            audio: AudioSettings::default(),
            development: DevelopmentConfig::default(),
        }
    }
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            order: PlaylistOrder::Ascending,
            sort_on_load: true,
            extensions: ["mp3", "flac", "ogg", "oga", "m4a", "mp4", "aac", "wav"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self { seek_seconds: 5 }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            footer: true,
            reserved_rows: 11,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { volume: 0.7 }
    }
}

impl Default for DevelopmentConfig {
    fn default() -> Self {
        let log_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cplayer")
            .join("logs");

        Self {
            log_dir,
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults there on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Rows left for the track window in a terminal `height` rows tall.
    pub fn viewport_rows(&self, height: u16) -> usize {
        height.saturating_sub(self.appearance.reserved_rows).max(1) as usize
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("cplayer");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.controls.seek_seconds, 5);
        assert_eq!(config.playlist.order, PlaylistOrder::Ascending);

        // the written file loads back to the same values
        let again = Config::load_from(&path).unwrap();
        assert_eq!(again.appearance.reserved_rows, config.appearance.reserved_rows);
        assert_eq!(again.playlist.extensions, config.playlist.extensions);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "music_directory = \"/srv/music\"\n\n[playlist]\norder = \"random\"\n\n[appearance]\nfooter = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.music_directory, PathBuf::from("/srv/music"));
        assert_eq!(config.playlist.order, PlaylistOrder::Random);
        assert!(config.playlist.sort_on_load);
        assert!(!config.appearance.footer);
        assert_eq!(config.appearance.reserved_rows, 11);
        assert_eq!(config.development.level, "info");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[playlist]\norder = \"sideways\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn viewport_rows_never_drop_below_one() {
        let config = Config::default();
        assert_eq!(config.viewport_rows(40), 29);
        assert_eq!(config.viewport_rows(5), 1);
    }
}
