//! Tokens: round portraits standing for creatures and characters.

use super::{Bounds, Shape, ShapeBase, ShapeId};
use crate::render::{MeshKind, RenderBackend, ShaderKind, Uniform};
use crate::transform::Transform2D;
use glam::{Vec2, Vec4};
use std::fmt;
use std::rc::Rc;
use tablekit_core::{Rgb, Rgba, SceneError, Texture};

/// Coloured status markers shown around a token's rim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusMarker {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl StatusMarker {
    pub const COUNT: usize = 8;

    pub const ALL: [StatusMarker; Self::COUNT] = [
        StatusMarker::Red,
        StatusMarker::Orange,
        StatusMarker::Yellow,
        StatusMarker::Green,
        StatusMarker::Cyan,
        StatusMarker::Blue,
        StatusMarker::Purple,
        StatusMarker::Pink,
    ];

    /// Bit position of this marker.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn colour(self) -> Rgb {
        match self {
            StatusMarker::Red => Rgb::new(0.9, 0.15, 0.15),
            StatusMarker::Orange => Rgb::new(0.95, 0.55, 0.1),
            StatusMarker::Yellow => Rgb::new(0.95, 0.9, 0.2),
            StatusMarker::Green => Rgb::new(0.2, 0.8, 0.25),
            StatusMarker::Cyan => Rgb::new(0.2, 0.85, 0.9),
            StatusMarker::Blue => Rgb::new(0.2, 0.35, 0.95),
            StatusMarker::Purple => Rgb::new(0.6, 0.25, 0.9),
            StatusMarker::Pink => Rgb::new(0.95, 0.45, 0.75),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusMarker::Red => "red",
            StatusMarker::Orange => "orange",
            StatusMarker::Yellow => "yellow",
            StatusMarker::Green => "green",
            StatusMarker::Cyan => "cyan",
            StatusMarker::Blue => "blue",
            StatusMarker::Purple => "purple",
            StatusMarker::Pink => "pink",
        }
    }
}

/// Fixed-size set of active status markers.
///
/// Persisted as a string of `'0'`/`'1'`, most significant marker first, so
/// `Red` (bit 0) is the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusSet(u8);

impl StatusSet {
    pub const fn empty() -> Self {
        StatusSet(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, marker: StatusMarker) -> bool {
        self.0 & (1 << marker.index()) != 0
    }

    pub fn set(&mut self, marker: StatusMarker, active: bool) {
        if active {
            self.0 |= 1 << marker.index();
        } else {
            self.0 &= !(1 << marker.index());
        }
    }

    pub fn toggled(mut self, marker: StatusMarker) -> Self {
        self.set(marker, !self.contains(marker));
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = StatusMarker> {
        StatusMarker::ALL
            .into_iter()
            .filter(move |m| self.contains(*m))
    }

    pub fn to_bitstring(self) -> String {
        format!("{:08b}", self.0)
    }

    /// Parses a bitstring. Shorter strings fill the low markers.
    pub fn from_bitstring(s: &str) -> Result<Self, SceneError> {
        if s.len() > StatusMarker::COUNT {
            return Err(SceneError::invalid(format!(
                "status bitstring '{}' has more than {} markers",
                s,
                StatusMarker::COUNT
            )));
        }
        let mut bits = 0u8;
        for c in s.chars() {
            bits <<= 1;
            match c {
                '0' => {}
                '1' => bits |= 1,
                other => {
                    return Err(SceneError::invalid(format!(
                        "invalid character '{}' in status bitstring '{}'",
                        other, s
                    )))
                }
            }
        }
        Ok(StatusSet(bits))
    }
}

impl fmt::Display for StatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bitstring())
    }
}

/// A round token. `scale.x` is its diameter in world units.
#[derive(Debug, Clone)]
pub struct Token {
    base: ShapeBase,
    pub name: String,
    texture: Option<Rc<Texture>>,
    pub border_colour: Rgba,
    /// Border thickness as a fraction of the radius.
    pub border_width: f32,
    pub statuses: StatusSet,
    /// Draws a cross over the portrait (downed, dead, ...).
    pub x_status: bool,
    pub opacity: f32,
}

impl Token {
    pub fn new(id: ShapeId, texture: Option<Rc<Texture>>) -> Self {
        Self {
            base: ShapeBase::new(id, Transform2D::default()),
            name: String::new(),
            texture,
            border_colour: Rgba::BLACK,
            border_width: 0.05,
            statuses: StatusSet::empty(),
            x_status: false,
            opacity: 1.0,
        }
    }

    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }

    pub fn set_texture(&mut self, texture: Option<Rc<Texture>>) {
        self.texture = texture;
    }

    /// Diameter in world units.
    pub fn size(&self) -> f32 {
        self.transform().scale().x.abs()
    }
}

impl Shape for Token {
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn contains(&self, point: Vec2) -> bool {
        point.distance(self.transform().position()) < self.size() * 0.5
    }

    /// The bounding square of the disc, so small drags still catch tokens.
    fn bounds(&self) -> Bounds {
        let t = self.transform();
        Bounds::from_center_size(t.position(), t.scale())
    }

    fn draw(&self, backend: &mut dyn RenderBackend) {
        backend.set_uniform("model", Uniform::Mat4(*self.transform().value()));
        backend.set_uniform(
            "borderColour",
            Uniform::Vec4(Vec4::from_array(self.border_colour.to_array())),
        );
        backend.set_uniform("borderWidth", Uniform::Float(self.border_width));
        backend.set_uniform("opacity", Uniform::Float(self.opacity));
        backend.set_uniform("statuses", Uniform::UInt(u32::from(self.statuses.bits())));
        backend.set_uniform("xStatus", Uniform::Bool(self.x_status));
        backend.set_uniform("highlighted", Uniform::Bool(self.is_highlighted()));
        backend.set_uniform("selected", Uniform::Bool(self.is_selected()));
        backend.draw_mesh(
            MeshKind::Circle,
            ShaderKind::Token,
            self.texture.as_deref().filter(|t| t.is_valid()),
        );
    }
}
