//! Square grid centred on the world origin, and the snapping rules built on it.

use crate::shapes::Shape;
use glam::Vec2;
use tablekit_core::Rgb;

/// Discrete token sizes, each a power-of-two multiple of one grid cell.
///
/// `Medium` occupies exactly one cell; each step up doubles the size and
/// each step down halves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeCategory {
    Fine,
    Diminutive,
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
    Colossal,
}

impl SizeCategory {
    pub const ALL: [SizeCategory; 9] = [
        SizeCategory::Fine,
        SizeCategory::Diminutive,
        SizeCategory::Tiny,
        SizeCategory::Small,
        SizeCategory::Medium,
        SizeCategory::Large,
        SizeCategory::Huge,
        SizeCategory::Gargantuan,
        SizeCategory::Colossal,
    ];

    /// Power-of-two exponent relative to one cell, `-4..=4`.
    pub fn ordinal(self) -> i32 {
        self as i32 - SizeCategory::Medium as i32
    }

    /// Inverse of `ordinal`; out-of-range ordinals are clamped.
    pub fn from_ordinal(ordinal: i32) -> Self {
        let index = (ordinal.clamp(-4, 4) + SizeCategory::Medium as i32) as usize;
        Self::ALL[index]
    }

    pub fn name(self) -> &'static str {
        match self {
            SizeCategory::Fine => "Fine",
            SizeCategory::Diminutive => "Diminutive",
            SizeCategory::Tiny => "Tiny",
            SizeCategory::Small => "Small",
            SizeCategory::Medium => "Medium",
            SizeCategory::Large => "Large",
            SizeCategory::Huge => "Huge",
            SizeCategory::Gargantuan => "Gargantuan",
            SizeCategory::Colossal => "Colossal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    scale: f32,
    pub colour: Rgb,
}

impl Grid {
    /// Creates a grid with `scale` world units per cell.
    ///
    /// Callers validate the scale; non-positive values make every snap a no-op.
    pub fn new(scale: f32, colour: Rgb) -> Self {
        Self { scale, colour }
    }

    /// World units per cell.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn is_usable(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0
    }

    /// World size of a size category.
    pub fn snap_category(&self, category: SizeCategory) -> f32 {
        let ordinal = category.ordinal();
        if ordinal >= 0 {
            self.scale * (1u32 << ordinal) as f32
        } else {
            self.scale / (1u32 << -ordinal) as f32
        }
    }

    /// The category whose world size is nearest to `size`, in powers of two.
    pub fn category_for_size(&self, size: f32) -> SizeCategory {
        if !self.is_usable() || !(size.is_finite() && size > 0.0) {
            return SizeCategory::Medium;
        }
        SizeCategory::from_ordinal((size / self.scale).log2().round() as i32)
    }

    /// Snaps a continuous size onto the grid.
    ///
    /// Sizes of at least one cell round to a whole number of cells. Smaller
    /// sizes round to `cell / n` for the nearest integer `n`. Non-positive
    /// or non-finite sizes are returned unchanged.
    pub fn snap_size(&self, size: f32) -> f32 {
        if !self.is_usable() || !(size.is_finite() && size > 0.0) {
            return size;
        }
        if size >= self.scale {
            (size / self.scale).round().max(1.0) * self.scale
        } else {
            let n = (self.scale / size).round().max(1.0);
            self.scale / n
        }
    }

    /// Centre of the cell containing `pos`.
    pub fn nearest_center(&self, pos: Vec2) -> Vec2 {
        if !self.is_usable() {
            return pos;
        }
        ((pos / self.scale).floor() + 0.5) * self.scale
    }

    /// Grid intersection closest to `pos`.
    pub fn nearest_corner(&self, pos: Vec2) -> Vec2 {
        if !self.is_usable() {
            return pos;
        }
        (pos / self.scale).round() * self.scale
    }

    /// Where a shape of world `size` dropped at `pos` should land.
    ///
    /// Shapes spanning an even number of cells sit on corners; one-cell,
    /// odd and sub-cell shapes sit on cell centres.
    pub fn snap_position_for_size(&self, size: f32, pos: Vec2) -> Vec2 {
        if !self.is_usable() {
            return pos;
        }
        let cells = (size.abs() / self.scale).round() as i64;
        if cells >= 1 && cells % 2 == 0 {
            self.nearest_corner(pos)
        } else {
            self.nearest_center(pos)
        }
    }

    /// `snap_position_for_size` using the shape's width.
    pub fn shape_snap_position(&self, shape: &dyn Shape, pos: Vec2) -> Vec2 {
        self.snap_position_for_size(shape.transform().scale().x, pos)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(1.0, Rgb::new(0.25, 0.25, 0.25))
    }
}
