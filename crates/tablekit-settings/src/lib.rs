//! Tablekit Settings Crate
//!
//! Handles editor configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{
    AdditiveModifier, Config, EditorSettings, GridSettings, ResourceSettings, SceneDefaults,
};
pub use error::{SettingsError, SettingsResult};
