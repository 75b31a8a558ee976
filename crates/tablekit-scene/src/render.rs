//! Rendering boundary.
//!
//! Shapes never touch the GPU. They set named uniforms and ask the backend
//! to draw one of a few meshes with one of a few shaders; the windowing layer
//! supplies the implementation.

use glam::{Mat4, Vec4};
use tablekit_core::Texture;

/// Value bound to a shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Mat4(Mat4),
    Vec4(Vec4),
    Float(f32),
    UInt(u32),
    Bool(bool),
}

/// Meshes the backend provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// Unit quad centred on the origin.
    Quad,
    /// Unit-diameter disc centred on the origin.
    Circle,
}

/// Shader programs the backend provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Token,
    Image,
    Overlay,
    Grid,
}

/// Render backend consumed by `Shape::draw` and `Scene::draw`.
pub trait RenderBackend {
    /// Clears the target to `colour` (RGBA).
    fn clear(&mut self, colour: Vec4);

    /// Binds a uniform for the next draw call.
    fn set_uniform(&mut self, name: &str, value: Uniform);

    /// Draws `mesh` with `shader`, sampling `texture` when one is given.
    fn draw_mesh(&mut self, mesh: MeshKind, shader: ShaderKind, texture: Option<&Texture>);
}
