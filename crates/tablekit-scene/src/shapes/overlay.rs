//! Transient rectangles drawn over the scene, such as the drag-select box.
//! Overlays are never persisted and never hit-tested.

use super::{Bounds, Shape, ShapeBase, ShapeId};
use crate::render::{MeshKind, RenderBackend, ShaderKind, Uniform};
use crate::transform::Transform2D;
use glam::{Vec2, Vec4};
use tablekit_core::Rgba;

#[derive(Debug, Clone)]
pub struct RectOverlay {
    base: ShapeBase,
    start: Vec2,
    end: Vec2,
    pub colour: Rgba,
}

impl RectOverlay {
    /// Creates a zero-sized overlay with both corners at `start`.
    pub fn new(id: ShapeId, start: Vec2, colour: Rgba) -> Self {
        let mut overlay = Self {
            base: ShapeBase::new(id, Transform2D::default()),
            start,
            end: start,
            colour,
        };
        overlay.update_transform();
        overlay
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn set_start(&mut self, start: Vec2) {
        self.start = start;
        self.update_transform();
    }

    pub fn set_end(&mut self, end: Vec2) {
        self.end = end;
        self.update_transform();
    }

    pub fn min(&self) -> Vec2 {
        self.start.min(self.end)
    }

    pub fn max(&self) -> Vec2 {
        self.start.max(self.end)
    }

    fn update_transform(&mut self) {
        let center = (self.start + self.end) * 0.5;
        let size = (self.end - self.start).abs();
        *self.transform_mut() = Transform2D::new(center, size, 0.0);
    }
}

impl Shape for RectOverlay {
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains(point)
    }

    fn bounds(&self) -> Bounds {
        Bounds {
            min: self.min(),
            max: self.max(),
        }
    }

    fn draw(&self, backend: &mut dyn RenderBackend) {
        backend.set_uniform("model", Uniform::Mat4(*self.transform().value()));
        backend.set_uniform("colour", Uniform::Vec4(Vec4::from_array(self.colour.to_array())));
        backend.draw_mesh(MeshKind::Quad, ShaderKind::Overlay, None);
    }
}
