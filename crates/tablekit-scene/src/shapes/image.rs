//! Background images (maps, handouts) laid under the tokens.

use super::{Bounds, Shape, ShapeBase, ShapeId};
use crate::render::{MeshKind, RenderBackend, ShaderKind, Uniform};
use crate::transform::Transform2D;
use glam::Vec2;
use std::rc::Rc;
use tablekit_core::Texture;

/// Width in world units of a freshly created image.
pub const DEFAULT_IMAGE_WIDTH: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct BgImage {
    base: ShapeBase,
    texture: Option<Rc<Texture>>,
    /// When set, swapping the texture leaves the transform alone.
    pub lock_ratio: bool,
}

impl BgImage {
    /// Creates an image `DEFAULT_IMAGE_WIDTH` wide with the texture's aspect.
    pub fn new(id: ShapeId, texture: Option<Rc<Texture>>) -> Self {
        let aspect = texture.as_ref().and_then(|t| t.aspect()).unwrap_or(1.0);
        let scale = Vec2::new(DEFAULT_IMAGE_WIDTH, DEFAULT_IMAGE_WIDTH / aspect);
        Self {
            base: ShapeBase::new(id, Transform2D::new(Vec2::ZERO, scale, 0.0)),
            texture,
            lock_ratio: false,
        }
    }

    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }

    /// Swaps the texture.
    ///
    /// With `lock_ratio` the current transform is kept. Otherwise the width
    /// is kept and the height follows the new texture's native aspect.
    /// Textures without a known size never change the transform.
    pub fn set_texture(&mut self, texture: Option<Rc<Texture>>) {
        if !self.lock_ratio {
            if let Some(aspect) = texture.as_ref().and_then(|t| t.aspect()) {
                let scale = self.transform().scale();
                let height = scale.x.abs() / aspect;
                self.transform_mut()
                    .set_scale(Vec2::new(scale.x, height.copysign(scale.y)));
            }
        }
        self.texture = texture;
    }
}

impl Shape for BgImage {
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn contains(&self, point: Vec2) -> bool {
        let half = self.transform().scale().abs() * 0.5;
        let d = (point - self.transform().position()).abs();
        d.x <= half.x && d.y <= half.y
    }

    fn bounds(&self) -> Bounds {
        let t = self.transform();
        Bounds::from_center_size(t.position(), t.scale())
    }

    fn draw(&self, backend: &mut dyn RenderBackend) {
        backend.set_uniform("model", Uniform::Mat4(*self.transform().value()));
        backend.set_uniform("highlighted", Uniform::Bool(self.is_highlighted()));
        backend.set_uniform("selected", Uniform::Bool(self.is_selected()));
        backend.draw_mesh(
            MeshKind::Quad,
            ShaderKind::Image,
            self.texture.as_deref().filter(|t| t.is_valid()),
        );
    }
}
