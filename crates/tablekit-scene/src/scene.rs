//! The scene: every shape, the grid, the cameras and which camera each view
//! looks through.
//!
//! Collections are kept in draw order. The last token is the topmost shape,
//! and tokens are always drawn (and hit-tested) above images.

use crate::camera::{Camera, CameraId};
use crate::grid::Grid;
use crate::render::{MeshKind, RenderBackend, ShaderKind, Uniform};
use crate::shapes::{BgImage, Bounds, RectOverlay, Shape, ShapeId, Token};
use crate::viewport::Viewport;
use glam::{Vec2, Vec4};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use tablekit_core::{Rgb, Rgba, Texture, Visibility};

/// The displays a scene is rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewId {
    /// The host's editing window.
    Editor,
    /// The players' display.
    Presentation,
}

impl ViewId {
    pub const ALL: [ViewId; 2] = [ViewId::Editor, ViewId::Presentation];

    /// Visibility role of the viewers looking at this view.
    pub fn role(self) -> Visibility {
        match self {
            ViewId::Editor => Visibility::HOST,
            ViewId::Presentation => Visibility::PRESENTATION,
        }
    }

    /// Name used in scene files.
    pub fn name(self) -> &'static str {
        match self {
            ViewId::Editor => "editor",
            ViewId::Presentation => "presentation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token or image detached from the scene, with enough information to put
/// it back. Used by add/remove actions.
#[derive(Debug, Clone)]
pub enum SceneObject {
    Token(Token),
    Image(BgImage),
}

impl SceneObject {
    pub fn id(&self) -> ShapeId {
        match self {
            SceneObject::Token(t) => t.id(),
            SceneObject::Image(i) => i.id(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    tokens: Vec<Token>,
    images: Vec<BgImage>,
    overlays: Vec<RectOverlay>,
    grid: Grid,
    cameras: Vec<Camera>,
    views: BTreeMap<ViewId, CameraId>,
    pub background_colour: Rgb,
    /// Visibility given to shapes created through `add_token`/`add_image`.
    pub default_visibility: Visibility,
    /// Locked tokens are drawn but cannot be hit or selected.
    pub tokens_locked: bool,
    pub images_locked: bool,
    /// Where the scene was last saved or loaded from.
    pub file_path: Option<PathBuf>,
    next_shape_id: u64,
    next_camera_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            images: Vec::new(),
            overlays: Vec::new(),
            grid: Grid::default(),
            cameras: Vec::new(),
            views: BTreeMap::new(),
            background_colour: Rgb::new(0.1, 0.1, 0.12),
            default_visibility: Visibility::ALL,
            tokens_locked: false,
            images_locked: false,
            file_path: None,
            next_shape_id: 1,
            next_camera_id: 1,
        }
    }

    /// Reserves a fresh shape id.
    pub fn allocate_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_shape_id);
        self.next_shape_id += 1;
        id
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn images(&self) -> &[BgImage] {
        &self.images
    }

    pub fn overlays(&self) -> &[RectOverlay] {
        &self.overlays
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.images.is_empty()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    // ---- Shapes ----

    /// Creates a token with the default visibility on top of all others.
    pub fn add_token(&mut self, texture: Option<Rc<Texture>>) -> ShapeId {
        let id = self.allocate_id();
        let mut token = Token::new(id, texture);
        token.set_visibility(self.default_visibility);
        self.tokens.push(token);
        id
    }

    /// Creates an image with the default visibility above the other images.
    pub fn add_image(&mut self, texture: Option<Rc<Texture>>) -> ShapeId {
        let id = self.allocate_id();
        let mut image = BgImage::new(id, texture);
        image.set_visibility(self.default_visibility);
        self.images.push(image);
        id
    }

    /// Appends an already built token as is.
    pub fn insert_token(&mut self, token: Token) {
        self.bump_ids(token.id());
        self.tokens.push(token);
    }

    /// Appends an already built image as is.
    pub fn insert_image(&mut self, image: BgImage) {
        self.bump_ids(image.id());
        self.images.push(image);
    }

    fn bump_ids(&mut self, id: ShapeId) {
        self.next_shape_id = self.next_shape_id.max(id.0 + 1);
    }

    pub fn add_overlay(&mut self, start: Vec2, colour: Rgba) -> ShapeId {
        let id = self.allocate_id();
        self.overlays.push(RectOverlay::new(id, start, colour));
        id
    }

    pub fn remove_overlay(&mut self, id: ShapeId) -> Option<RectOverlay> {
        let index = self.overlays.iter().position(|o| o.id() == id)?;
        Some(self.overlays.remove(index))
    }

    pub fn overlay(&self, id: ShapeId) -> Option<&RectOverlay> {
        self.overlays.iter().find(|o| o.id() == id)
    }

    pub fn overlay_mut(&mut self, id: ShapeId) -> Option<&mut RectOverlay> {
        self.overlays.iter_mut().find(|o| o.id() == id)
    }

    /// Removes the tokens whose ids are in `ids`. Unknown ids are ignored.
    pub fn remove_tokens(&mut self, ids: &HashSet<ShapeId>) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|t| !ids.contains(&t.id()));
        before - self.tokens.len()
    }

    /// Removes the images whose ids are in `ids`. Unknown ids are ignored.
    pub fn remove_images(&mut self, ids: &HashSet<ShapeId>) -> usize {
        let before = self.images.len();
        self.images.retain(|i| !ids.contains(&i.id()));
        before - self.images.len()
    }

    pub fn clear_tokens(&mut self) {
        self.tokens.clear();
    }

    pub fn clear_images(&mut self) {
        self.images.clear();
    }

    pub fn token(&self, id: ShapeId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id() == id)
    }

    pub fn token_mut(&mut self, id: ShapeId) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.id() == id)
    }

    pub fn image(&self, id: ShapeId) -> Option<&BgImage> {
        self.images.iter().find(|i| i.id() == id)
    }

    pub fn image_mut(&mut self, id: ShapeId) -> Option<&mut BgImage> {
        self.images.iter_mut().find(|i| i.id() == id)
    }

    /// Any token, image or overlay by id.
    pub fn shape(&self, id: ShapeId) -> Option<&dyn Shape> {
        if let Some(t) = self.token(id) {
            return Some(t as &dyn Shape);
        }
        if let Some(i) = self.image(id) {
            return Some(i as &dyn Shape);
        }
        self.overlay(id).map(|o| o as &dyn Shape)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut dyn Shape> {
        if let Some(index) = self.tokens.iter().position(|t| t.id() == id) {
            return Some(&mut self.tokens[index] as &mut dyn Shape);
        }
        if let Some(index) = self.images.iter().position(|i| i.id() == id) {
            return Some(&mut self.images[index] as &mut dyn Shape);
        }
        self.overlay_mut(id).map(|o| o as &mut dyn Shape)
    }

    /// Tokens then images, each in draw order.
    pub fn shapes(&self) -> impl Iterator<Item = &dyn Shape> + '_ {
        self.tokens
            .iter()
            .map(|t| t as &dyn Shape)
            .chain(self.images.iter().map(|i| i as &dyn Shape))
    }

    pub fn shapes_mut(&mut self) -> impl Iterator<Item = &mut dyn Shape> + '_ {
        self.tokens
            .iter_mut()
            .map(|t| t as &mut dyn Shape)
            .chain(self.images.iter_mut().map(|i| i as &mut dyn Shape))
    }

    /// Detaches a token or image, returning it with its draw index.
    pub fn take_object(&mut self, id: ShapeId) -> Option<(SceneObject, usize)> {
        if let Some(index) = self.tokens.iter().position(|t| t.id() == id) {
            return Some((SceneObject::Token(self.tokens.remove(index)), index));
        }
        let index = self.images.iter().position(|i| i.id() == id)?;
        Some((SceneObject::Image(self.images.remove(index)), index))
    }

    /// Puts a detached object back at `index` (clamped to the collection length).
    pub fn restore_object(&mut self, object: SceneObject, index: usize) {
        self.bump_ids(object.id());
        match object {
            SceneObject::Token(t) => {
                let index = index.min(self.tokens.len());
                self.tokens.insert(index, t);
            }
            SceneObject::Image(i) => {
                let index = index.min(self.images.len());
                self.images.insert(index, i);
            }
        }
    }

    /// Position of a token or image within its collection.
    pub fn draw_index(&self, id: ShapeId) -> Option<usize> {
        self.tokens
            .iter()
            .position(|t| t.id() == id)
            .or_else(|| self.images.iter().position(|i| i.id() == id))
    }

    pub fn contains_shape(&self, id: ShapeId) -> bool {
        self.token(id).is_some() || self.image(id).is_some()
    }

    // ---- Queries ----

    /// Unlocked tokens and images whose bounds intersect the rectangle
    /// spanned by `lo` and `hi`. Tokens use their bounding square.
    pub fn shapes_in_bounds(&self, lo: Vec2, hi: Vec2) -> Vec<ShapeId> {
        let area = Bounds::from_corners(lo, hi);
        let mut found = Vec::new();
        if !self.tokens_locked {
            found.extend(
                self.tokens
                    .iter()
                    .filter(|t| t.bounds().intersects(&area))
                    .map(|t| t.id()),
            );
        }
        if !self.images_locked {
            found.extend(
                self.images
                    .iter()
                    .filter(|i| i.bounds().intersects(&area))
                    .map(|i| i.id()),
            );
        }
        found
    }

    /// Union of every token and image bound, or `None` for an empty scene.
    pub fn bounds(&self) -> Option<Bounds> {
        self.shapes()
            .map(|s| s.bounds())
            .reduce(|acc, b| acc.union(&b))
    }

    /// The topmost unlocked shape containing the world-space `point`.
    pub fn shape_at(&self, point: Vec2) -> Option<ShapeId> {
        if !self.tokens_locked {
            if let Some(t) = self.tokens.iter().rev().find(|t| t.contains(point)) {
                return Some(t.id());
            }
        }
        if !self.images_locked {
            if let Some(i) = self.images.iter().rev().find(|i| i.contains(point)) {
                return Some(i.id());
            }
        }
        None
    }

    /// `shape_at` for a pixel position seen through `camera`.
    pub fn shape_at_screen_pos(
        &self,
        camera: &Camera,
        viewport: &Viewport,
        screen: Vec2,
    ) -> Option<ShapeId> {
        let world = camera.screen_to_world(viewport, screen)?;
        self.shape_at(world)
    }

    // ---- Cameras and views ----

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.iter().find(|c| c.id == id)
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.iter_mut().find(|c| c.id == id)
    }

    /// Registers a camera and returns its id.
    pub fn add_camera(&mut self, mut camera: Camera) -> CameraId {
        camera.id = CameraId(self.next_camera_id);
        self.next_camera_id += 1;
        let id = camera.id;
        self.cameras.push(camera);
        id
    }

    /// Removes a camera. Views bound to it fall back to the first remaining
    /// camera, or become unbound when none is left.
    pub fn remove_camera(&mut self, id: CameraId) -> Option<Camera> {
        let index = self.cameras.iter().position(|c| c.id == id)?;
        let removed = self.cameras.remove(index);
        let fallback = self.cameras.first().map(|c| c.id);

        self.views.retain(|_, bound| *bound != id || fallback.is_some());
        if let Some(fallback) = fallback {
            for bound in self.views.values_mut().filter(|b| **b == id) {
                *bound = fallback;
            }
        }
        tracing::debug!("Removed {} ({})", removed.name, id);
        Some(removed)
    }

    /// Removes every camera and unbinds every view.
    pub fn clear_cameras(&mut self) {
        self.cameras.clear();
        self.views.clear();
    }

    /// Binds `view` to `camera`, registering the camera first if this scene
    /// does not own it yet. Returns the camera's id.
    pub fn set_view_camera(&mut self, view: ViewId, camera: Camera) -> CameraId {
        let id = if self.camera(camera.id).is_some() {
            camera.id
        } else {
            self.add_camera(camera)
        };
        self.views.insert(view, id);
        id
    }

    /// Binds `view` to an already registered camera. Returns false if the
    /// camera is unknown.
    pub fn bind_view(&mut self, view: ViewId, camera: CameraId) -> bool {
        if self.camera(camera).is_none() {
            return false;
        }
        self.views.insert(view, camera);
        true
    }

    pub fn unbind_view(&mut self, view: ViewId) {
        self.views.remove(&view);
    }

    pub fn clear_views(&mut self) {
        self.views.clear();
    }

    pub fn view_camera_id(&self, view: ViewId) -> Option<CameraId> {
        self.views.get(&view).copied()
    }

    pub fn view_camera(&self, view: ViewId) -> Option<&Camera> {
        self.camera(self.view_camera_id(view)?)
    }

    pub fn view_camera_mut(&mut self, view: ViewId) -> Option<&mut Camera> {
        let id = self.view_camera_id(view)?;
        self.camera_mut(id)
    }

    pub fn views(&self) -> impl Iterator<Item = (ViewId, CameraId)> + '_ {
        self.views.iter().map(|(v, c)| (*v, *c))
    }

    // ---- Drawing ----

    /// Draws the scene as seen through `view`: images, grid, tokens, then
    /// overlays. Shapes hidden from the view's role are skipped; overlays are
    /// only drawn for the editor.
    pub fn draw(&self, backend: &mut dyn RenderBackend, view: ViewId) {
        backend.clear(Vec4::from_array(self.background_colour.with_alpha(1.0).to_array()));

        let Some(camera) = self.view_camera(view) else {
            return;
        };
        backend.set_uniform("view", Uniform::Mat4(camera.view_matrix()));
        backend.set_uniform("projection", Uniform::Mat4(*camera.projection()));

        let role = view.role();
        for image in self.images.iter().filter(|i| i.is_visible_to(role)) {
            image.draw(backend);
        }

        backend.set_uniform("gridScale", Uniform::Float(self.grid.scale()));
        backend.set_uniform(
            "colour",
            Uniform::Vec4(Vec4::from_array(self.grid.colour.with_alpha(1.0).to_array())),
        );
        backend.draw_mesh(MeshKind::Quad, ShaderKind::Grid, None);

        for token in self.tokens.iter().filter(|t| t.is_visible_to(role)) {
            token.draw(backend);
        }

        if view == ViewId::Editor {
            for overlay in &self.overlays {
                overlay.draw(backend);
            }
        }
    }
}
