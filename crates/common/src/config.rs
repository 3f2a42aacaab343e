//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{XmemlError, XmemlResult};
use crate::target::TargetEditor;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default export settings, used when a manifest leaves them out.
    #[serde(default)]
    pub export: ExportDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied to new timelines and exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// Editor the document is written for.
    pub target: TargetEditor,

    /// Timeline framerate (frames per second).
    pub framerate: u32,

    /// Timeline width in pixels.
    pub width: u32,

    /// Timeline height in pixels.
    pub height: u32,

    /// Number of audio output channels on new timelines.
    pub audio_channels: u32,

    /// Directory exported documents are written to when no output path is given.
    pub output_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "xmeml=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export: ExportDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            target: TargetEditor::Premiere,
            framerate: 25,
            width: 1920,
            height: 1080,
            audio_channels: 2,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(XmemlError::FileNotFound { .. }) => Self::default(),
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> XmemlResult<Self> {
        if !path.exists() {
            return Err(XmemlError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the standard location and return where it went.
    pub fn save(&self) -> XmemlResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> XmemlResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("xmeml").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.export.target, TargetEditor::Premiere);
        assert_eq!(config.export.framerate, 25);
        assert_eq!(config.export.audio_channels, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "export": { "target": "resolve", "framerate": 24 } }"#)
                .unwrap();
        assert_eq!(config.export.target, TargetEditor::Resolve);
        assert_eq!(config.export.framerate, 24);
        assert_eq!(config.export.width, 1920);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = std::env::temp_dir().join(format!("xmeml-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.export.target = TargetEditor::Resolve;
        config.export.framerate = 30;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.export.target, TargetEditor::Resolve);
        assert_eq!(loaded.export.framerate, 30);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_from_reports_missing_and_malformed_files() {
        let dir = std::env::temp_dir().join(format!("xmeml-config-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("absent.json");
        assert!(matches!(
            AppConfig::load_from(&missing),
            Err(XmemlError::FileNotFound { .. })
        ));

        let malformed = dir.join("config.json");
        std::fs::write(&malformed, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load_from(&malformed),
            Err(XmemlError::Json(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
