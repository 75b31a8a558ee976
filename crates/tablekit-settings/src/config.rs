//! Configuration and settings management for Tablekit
//!
//! Provides configuration file handling, defaults and validation.
//! Supports JSON and TOML files; the default location is
//! `<config dir>/tablekit/config.toml`.
//!
//! Configuration is organized into logical sections:
//! - Editor behaviour (undo depth, snapping, selection modifier)
//! - Grid defaults (cell size, colour)
//! - Scene defaults (background colour, visibility of new shapes)
//! - Resources (where relative texture paths are resolved)

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tablekit_core::{Rgb, Visibility};

/// Modifier key that makes a click add to the selection instead of replacing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdditiveModifier {
    /// Shift-click adds to the selection
    #[default]
    Shift,
    /// Ctrl-click adds to the selection
    Ctrl,
}

/// Editor behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Maximum number of undoable actions kept
    pub undo_depth: usize,
    /// Snap dragged shapes to the grid
    pub snap_to_grid: bool,
    /// Modifier for additive selection
    pub additive_modifier: AdditiveModifier,
    /// Number of recent files to track
    pub recent_files_count: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            undo_depth: 100,
            snap_to_grid: true,
            additive_modifier: AdditiveModifier::default(),
            recent_files_count: 10,
        }
    }
}

/// Grid defaults for new scenes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// World units per grid cell
    pub scale: f32,
    /// Line colour
    pub colour: Rgb,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            colour: Rgb::new(0.25, 0.25, 0.25),
        }
    }
}

/// Defaults applied to new scenes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDefaults {
    /// Clear colour behind everything
    pub background_colour: Rgb,
    /// Visibility mask given to newly created shapes
    pub default_visibility: Visibility,
}

impl Default for SceneDefaults {
    fn default() -> Self {
        Self {
            background_colour: Rgb::new(0.1, 0.1, 0.12),
            default_visibility: Visibility::ALL,
        }
    }
}

/// Resource lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    /// Directory that relative texture paths are resolved against
    pub texture_root: PathBuf,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            texture_root: dirs::data_dir()
                .map(|d| d.join("tablekit").join("textures"))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor behaviour
    pub editor: EditorSettings,
    /// Grid defaults
    pub grid: GridSettings,
    /// Scene defaults
    pub scene: SceneDefaults,
    /// Resource lookup
    pub resources: ResourceSettings,
    /// Recent files list, most recent first
    pub recent_files: Vec<PathBuf>,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("tablekit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from `path`, falling back to defaults when the file is
    /// missing or unusable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
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

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.editor.undo_depth == 0 {
            return Err(SettingsError::invalid("editor.undo_depth", "must be > 0"));
        }

        if !(self.grid.scale.is_finite() && self.grid.scale > 0.0) {
            return Err(SettingsError::invalid(
                "grid.scale",
                format!("must be a positive number, got {}", self.grid.scale),
            ));
        }

        Ok(())
    }

    /// Add file to recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|f| f != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.editor.recent_files_count);
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
