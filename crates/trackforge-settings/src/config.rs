//! Settings file handling for Trackforge
//!
//! A settings file bundles everything a build needs besides the layout itself:
//! - Print parameters (magnet size, walls, gaps, bed)
//! - The typeface used for labels and dial digits
//! - Tessellation quality for cylinders and glyph curves
//! - Export options
//!
//! Files may be JSON or TOML; the format is picked from the extension.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trackforge_core::{Configuration, FontSource, Tessellation};

use crate::error::{SettingsError, SettingsResult};

/// Default settings file name inside the platform config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Export preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// File name used when no explicit output path is given
    pub archive_name: String,
    /// Write `manifest.txt` next to the STL files
    pub include_manifest: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            archive_name: "tracker.zip".to_string(),
            include_manifest: true,
        }
    }
}

/// Complete settings record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Physical print parameters
    pub print: Configuration,
    /// Typeface for labels and dial digits
    pub font: FontSource,
    /// Curve approximation quality
    pub geometry: Tessellation,
    /// Export preferences
    pub export: ExportSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_for(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        Some(other) => Err(SettingsError::UnsupportedFormat(other.to_string())),
        None => Err(SettingsError::UnsupportedFormat(
            "missing file extension".to_string(),
        )),
    }
}

impl Settings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform-specific default location of the settings file
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(dir.join("trackforge").join(SETTINGS_FILE_NAME))
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_for(path)?;
        let content = std::fs::read_to_string(path)?;

        let settings: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        settings.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from file, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!(
                "No settings at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_for(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        self.print.validate()?;
        self.geometry.validate()?;

        if self.export.archive_name.trim().is_empty() {
            return Err(SettingsError::Invalid(
                trackforge_core::ConfigError::OutOfRange {
                    field: "archiveName",
                    reason: "must not be empty".to_string(),
                },
            ));
        }

        Ok(())
    }
}
