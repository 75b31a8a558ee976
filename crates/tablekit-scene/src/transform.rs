//! Affine 2D transform shared by every shape.
//!
//! The matrix is derived state. Every setter rebuilds it immediately as
//! translate * rotate * scale, so `value()` is always current.

use glam::{Mat4, Quat, Vec2, Vec3};

/// Position, per-axis scale and rotation (degrees) of a shape.
#[derive(Debug, Clone, Copy)]
pub struct Transform2D {
    position: Vec2,
    scale: Vec2,
    rotation: f32,
    matrix: Mat4,
}

impl Transform2D {
    pub fn new(position: Vec2, scale: Vec2, rotation: f32) -> Self {
        let mut transform = Self {
            position,
            scale,
            rotation,
            matrix: Mat4::IDENTITY,
        };
        transform.rebuild();
        transform
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Rotation in degrees, counter-clockwise.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// The model matrix.
    pub fn value(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.rebuild();
    }

    /// Sets per-axis scale. Negative values mirror the shape and are kept as-is.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.rebuild();
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.set_scale(Vec2::splat(scale));
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.rebuild();
    }

    /// Moves the position by `delta`.
    pub fn offset(&mut self, delta: Vec2) {
        self.position += delta;
        self.rebuild();
    }

    /// Recomputes the matrix from position, rotation and scale.
    pub fn rebuild(&mut self) {
        self.matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(self.scale.x, self.scale.y, 1.0),
            Quat::from_rotation_z(self.rotation.to_radians()),
            self.position.extend(0.0),
        );
    }

    /// Maps a point in the shape's local unit square into world space.
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.matrix.transform_point3(local.extend(0.0)).truncate()
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE, 0.0)
    }
}

impl PartialEq for Transform2D {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.scale == other.scale
            && self.rotation == other.rotation
    }
}
