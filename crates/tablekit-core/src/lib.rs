//! # Tablekit Core
//!
//! Core types shared by every Tablekit crate:
//! - Error types for scene persistence and resource loading
//! - RGB/RGBA colours used by shapes, the grid and the scene background
//! - Visibility roles (which viewers a shape is shown to)
//! - The texture resource provider and its path-keyed cache

pub mod color;
pub mod error;
pub mod resources;
pub mod visibility;

pub use color::{Rgb, Rgba};
pub use error::{Error, Result, SceneError};
pub use resources::{BuiltinTexture, ResourceProvider, Texture};
pub use visibility::Visibility;
