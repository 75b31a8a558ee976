//! Cameras looking down the -Z axis at the scene plane (z = 0).
//!
//! The projection matrix is a pure function of the lens parameters and is
//! rebuilt by every lens setter. The view matrix is derived from the
//! position on demand.

use crate::shapes::Bounds;
use crate::viewport::Viewport;
use glam::{Mat4, Vec2, Vec3};
use std::fmt;

const MIN_FOCAL: f32 = 0.01;
const MAX_FOCAL: f32 = 100.0;

/// Identifier of a camera within one scene. `CameraId::UNASSIGNED` marks a
/// camera the scene has not registered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub u64);

impl CameraId {
    pub const UNASSIGNED: CameraId = CameraId(0);
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub(crate) id: CameraId,
    pub name: String,
    position: Vec3,
    h_aperture: f32,
    v_aperture: f32,
    focal: f32,
    ortho: bool,
    near: f32,
    far: f32,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new("Camera")
    }
}

impl Camera {
    /// Orthographic camera 10 units above the origin showing 16 x 9 units.
    pub fn new(name: impl Into<String>) -> Self {
        let mut camera = Self {
            id: CameraId::UNASSIGNED,
            name: name.into(),
            position: Vec3::new(0.0, 0.0, 10.0),
            h_aperture: 8.0,
            v_aperture: 4.5,
            focal: 1.0,
            ortho: true,
            near: 0.1,
            far: 100.0,
            projection: Mat4::IDENTITY,
        };
        camera.rebuild_projection();
        camera
    }

    pub fn id(&self) -> CameraId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the camera. Only x and y matter for an orthographic camera.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn h_aperture(&self) -> f32 {
        self.h_aperture
    }

    pub fn v_aperture(&self) -> f32 {
        self.v_aperture
    }

    pub fn set_aperture(&mut self, horizontal: f32, vertical: f32) {
        self.h_aperture = horizontal;
        self.v_aperture = vertical;
        self.rebuild_projection();
    }

    /// Zoom factor. Larger values show less of the scene.
    pub fn focal(&self) -> f32 {
        self.focal
    }

    pub fn set_focal(&mut self, focal: f32) {
        self.focal = focal.clamp(MIN_FOCAL, MAX_FOCAL);
        self.rebuild_projection();
    }

    pub fn is_ortho(&self) -> bool {
        self.ortho
    }

    pub fn set_ortho(&mut self, ortho: bool) {
        self.ortho = ortho;
        self.rebuild_projection();
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.rebuild_projection();
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        let target = Vec3::new(self.position.x, self.position.y, 0.0);
        Mat4::look_at_rh(self.position, target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Half width and half height of the visible region on the scene plane.
    pub fn visible_half_extents(&self) -> Vec2 {
        let half = Vec2::new(self.h_aperture, self.v_aperture) / self.focal;
        if self.ortho {
            half
        } else {
            half * self.position.z.abs()
        }
    }

    fn rebuild_projection(&mut self) {
        self.projection = if self.ortho {
            let half_w = self.h_aperture / self.focal;
            let half_h = self.v_aperture / self.focal;
            Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
        } else {
            let fov_y = 2.0 * (self.v_aperture / self.focal).atan();
            let aspect = if self.v_aperture != 0.0 {
                self.h_aperture / self.v_aperture
            } else {
                1.0
            };
            Mat4::perspective_rh(fov_y, aspect, self.near, self.far)
        };
    }

    /// Keeps the horizontal aperture and derives the vertical one from the
    /// framebuffer so the scene is not stretched.
    pub fn set_aspect(&mut self, viewport: &Viewport) {
        self.v_aperture = self.h_aperture / viewport.aspect();
        self.rebuild_projection();
    }

    /// Converts a pixel position to the point it covers on the scene plane.
    ///
    /// Returns `None` when the view ray is parallel to the plane.
    pub fn screen_to_world(&self, viewport: &Viewport, screen: Vec2) -> Option<Vec2> {
        let ndc = viewport.screen_to_ndc(screen);
        let inverse = self.view_projection().inverse();
        // glam projections use a [0, 1] depth range.
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

        let dz = far.z - near.z;
        if dz.abs() < f32::EPSILON {
            return None;
        }
        let t = -near.z / dz;
        let hit = near + (far - near) * t;
        hit.is_finite().then(|| hit.truncate())
    }

    /// Converts a scene-plane point to a pixel position.
    pub fn world_to_screen(&self, viewport: &Viewport, world: Vec2) -> Vec2 {
        let ndc = self.view_projection().project_point3(world.extend(0.0));
        viewport.ndc_to_screen(ndc.truncate())
    }

    /// Centres on `bounds` and zooms so it fits with `padding` (fraction of
    /// the bounds' size added on each side). Empty bounds only re-centre.
    pub fn frame_bounds(&mut self, bounds: &Bounds, padding: f32) {
        let center = bounds.center();
        self.position.x = center.x;
        self.position.y = center.y;

        let half = bounds.size() * 0.5 * (1.0 + padding.max(0.0));
        if half.x <= 0.0 && half.y <= 0.0 {
            return;
        }

        if self.ortho {
            let fx = if half.x > 0.0 { self.h_aperture / half.x } else { f32::MAX };
            let fy = if half.y > 0.0 { self.v_aperture / half.y } else { f32::MAX };
            self.set_focal(fx.min(fy));
        } else {
            let zx = half.x * self.focal / self.h_aperture;
            let zy = half.y * self.focal / self.v_aperture;
            self.position.z = zx.max(zy).clamp(self.near * 2.0, self.far * 0.5);
        }
        tracing::debug!(
            "Framed {} on ({}, {}) focal {}",
            self.name,
            center.x,
            center.y,
            self.focal
        );
    }

    /// Multiplies the focal length by `factor`; values above one zoom in.
    pub fn zoom_by(&mut self, factor: f32) {
        if factor > 0.0 && factor.is_finite() {
            self.set_focal(self.focal * factor);
        }
    }

    /// Moves the camera across the scene plane by a world-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.position.x += delta.x;
        self.position.y += delta.y;
    }
}
