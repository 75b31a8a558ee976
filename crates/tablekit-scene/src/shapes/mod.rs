//! Shapes placed in a scene.
//!
//! Every shape carries a [`ShapeBase`] (id, transform, visibility and the
//! transient highlight/selection flags) plus its own attributes. The
//! [`Shape`] trait is the capability set the scene, selection and actions
//! work through; variants only supply containment, bounds and drawing.

mod image;
mod overlay;
mod token;

pub use image::BgImage;
pub use overlay::RectOverlay;
pub use token::{StatusMarker, StatusSet, Token};

use crate::render::RenderBackend;
use crate::transform::Transform2D;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use tablekit_core::Visibility;

/// Identifier of a shape within one scene. Never reused by that scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Builds bounds from two opposite corners in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Bounds of a box centred on `center` with full extent `size`.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Edges touching counts as intersecting.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// State every shape carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeBase {
    id: ShapeId,
    transform: Transform2D,
    visibility: Visibility,
    highlighted: bool,
    selected: bool,
}

impl ShapeBase {
    pub fn new(id: ShapeId, transform: Transform2D) -> Self {
        Self {
            id,
            transform,
            visibility: Visibility::ALL,
            highlighted: false,
            selected: false,
        }
    }
}

/// Capability set shared by tokens, background images and overlays.
pub trait Shape {
    fn base(&self) -> &ShapeBase;
    fn base_mut(&mut self) -> &mut ShapeBase;

    /// True if the world-space `point` lies inside the shape.
    fn contains(&self, point: Vec2) -> bool;

    /// Axis-aligned bounds used for rectangle selection and framing.
    /// Rotation is ignored.
    fn bounds(&self) -> Bounds;

    /// Binds this shape's uniforms and issues its draw call.
    fn draw(&self, backend: &mut dyn RenderBackend);

    fn id(&self) -> ShapeId {
        self.base().id
    }

    fn transform(&self) -> &Transform2D {
        &self.base().transform
    }

    fn transform_mut(&mut self) -> &mut Transform2D {
        &mut self.base_mut().transform
    }

    fn visibility(&self) -> Visibility {
        self.base().visibility
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.base_mut().visibility = visibility;
    }

    fn is_visible_to(&self, role: Visibility) -> bool {
        self.base().visibility.is_visible_to(role)
    }

    fn is_highlighted(&self) -> bool {
        self.base().highlighted
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.base_mut().highlighted = highlighted;
    }

    fn is_selected(&self) -> bool {
        self.base().selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.base_mut().selected = selected;
    }
}
