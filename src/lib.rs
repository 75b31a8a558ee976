//! # Tablekit
//!
//! A 2D virtual tabletop scene editor:
//! - Round tokens with names, borders, status markers and per-viewer visibility
//! - Background images laid under a square grid
//! - Grid snapping of token sizes and positions
//! - Click, additive and drag selection with undoable editing
//! - JSON scene files with merge-loading for import and paste
//!
//! ## Architecture
//!
//! Tablekit is organized as a workspace with multiple crates:
//!
//! 1. **tablekit-core** - Errors, colours, visibility roles, texture resources
//! 2. **tablekit-scene** - Scene model, selection, undo/redo, persistence, editor state
//! 3. **tablekit-settings** - Persisted editor configuration
//! 4. **tablekit** - Main binary that integrates all crates
//!
//! The windowing layer drives [`EditorState`] with [`InputEvent`]s and renders
//! each view through its own [`RenderBackend`].

pub use tablekit_core::{
    BuiltinTexture, Error, ResourceProvider, Result, Rgb, Rgba, SceneError, Texture, Visibility,
};

pub use tablekit_scene::{
    load_scene, save_scene, Action, ActionStack, BgImage, Camera, EditorState, Grid, InputEvent,
    RenderBackend, Scene, SceneDocument, SerializeOptions, Shape, ShapeId, SizeCategory,
    StatusMarker, Token, ViewId, Viewport,
};

pub use tablekit_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (INFO when unset)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
