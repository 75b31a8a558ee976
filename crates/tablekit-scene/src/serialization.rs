//! Scene files.
//!
//! A scene is stored as one JSON object. Every section is optional: a
//! missing section leaves the corresponding part of the scene untouched,
//! which is what makes merge-loading (import, paste) work. Within a token or
//! image, missing fields take their defaults.
//!
//! Loading is two-phase. The whole document is parsed and validated first;
//! only then is the scene modified, so a bad document never leaves a scene
//! half-loaded.

use crate::camera::{Camera, CameraId};
use crate::scene::{Scene, ViewId};
use crate::shapes::{BgImage, Shape, ShapeId, StatusSet, Token};
use crate::transform::Transform2D;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;
use tablekit_core::{ResourceProvider, Rgba, SceneError, Texture, Visibility};

/// Complete scene file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images_locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cameras: Option<Vec<CameraData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<Vec<ViewData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridData>,
}

/// Serialized transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixData {
    pub pos: [f32; 2],
    pub scale: [f32; 2],
    /// Degrees
    pub rotation: f32,
}

impl Default for MatrixData {
    fn default() -> Self {
        Self {
            pos: [0.0, 0.0],
            scale: [1.0, 1.0],
            rotation: 0.0,
        }
    }
}

impl MatrixData {
    fn from_transform(t: &Transform2D) -> Self {
        Self {
            pos: t.position().to_array(),
            scale: t.scale().to_array(),
            rotation: t.rotation(),
        }
    }

    fn to_transform(&self) -> Transform2D {
        Transform2D::new(
            Vec2::from_array(self.pos),
            Vec2::from_array(self.scale),
            self.rotation,
        )
    }
}

/// Serialized token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    #[serde(rename = "matrix2D", default)]
    pub matrix: MatrixData,
    /// Texture key, as passed to `ResourceProvider::texture`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_border_colour")]
    pub border_colour: [f32; 4],
    #[serde(default = "default_border_width")]
    pub border_width: f32,
    /// Status markers as a bitstring, most significant first
    #[serde(default = "default_statuses")]
    pub statuses: String,
    #[serde(rename = "xstatus", default)]
    pub x_status: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub visibility: Visibility,
}

/// Serialized background image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    /// Texture key, as passed to `ResourceProvider::texture`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(rename = "matrix2D", default)]
    pub matrix: MatrixData,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub lock_ratio: bool,
}

/// Serialized camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraData {
    #[serde(default = "default_camera_pos")]
    pub pos: [f32; 3],
    #[serde(default = "default_focal")]
    pub focal: f32,
    #[serde(default)]
    pub name: String,
}

/// Serialized view binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewData {
    pub id: String,
    /// Index into the document's cameras, or the scene's when the document
    /// has none
    pub index: i64,
}

/// Serialized grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridData {
    pub scale: f32,
}

fn default_border_colour() -> [f32; 4] {
    Rgba::BLACK.to_array()
}

fn default_border_width() -> f32 {
    0.05
}

fn default_statuses() -> String {
    StatusSet::empty().to_bitstring()
}

fn default_opacity() -> f32 {
    1.0
}

fn default_camera_pos() -> [f32; 3] {
    [0.0, 0.0, 10.0]
}

fn default_focal() -> f32 {
    1.0
}

/// Which sections `SceneDocument::from_scene` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    pub tokens: bool,
    pub images: bool,
    pub cameras: bool,
    pub grid: bool,
    pub views: bool,
    /// Only write selected tokens and images, and skip scene-wide settings
    /// (default visibility, lock flags).
    pub selected_only: bool,
}

impl SerializeOptions {
    /// Everything, as written by Save.
    pub fn all() -> Self {
        Self {
            tokens: true,
            images: true,
            cameras: true,
            grid: true,
            views: true,
            selected_only: false,
        }
    }

    /// Selected tokens and images only, as written by Copy.
    pub fn selection() -> Self {
        Self {
            tokens: true,
            images: true,
            cameras: false,
            grid: false,
            views: false,
            selected_only: true,
        }
    }
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// A validated token waiting to be inserted.
struct PendingToken<'a> {
    data: &'a TokenData,
    statuses: StatusSet,
}

impl SceneDocument {
    /// Captures the parts of `scene` chosen by `options`.
    pub fn from_scene(scene: &Scene, options: SerializeOptions) -> Self {
        let wanted = |s: &dyn Shape| !options.selected_only || s.is_selected();
        let mut doc = SceneDocument::default();

        if !options.selected_only {
            doc.default_visibility = Some(scene.default_visibility);
        }

        if options.tokens {
            doc.tokens = Some(
                scene
                    .tokens()
                    .iter()
                    .filter(|t| wanted(*t as &dyn Shape))
                    .map(token_to_data)
                    .collect(),
            );
            if !options.selected_only {
                doc.tokens_locked = Some(scene.tokens_locked);
            }
        }

        if options.images {
            doc.images = Some(
                scene
                    .images()
                    .iter()
                    .filter(|i| wanted(*i as &dyn Shape))
                    .map(image_to_data)
                    .collect(),
            );
            if !options.selected_only {
                doc.images_locked = Some(scene.images_locked);
            }
        }

        if options.cameras {
            doc.cameras = Some(
                scene
                    .cameras()
                    .iter()
                    .map(|c| CameraData {
                        pos: c.position().to_array(),
                        focal: c.focal(),
                        name: c.name.clone(),
                    })
                    .collect(),
            );
        }

        if options.views {
            doc.views = Some(
                scene
                    .views()
                    .filter_map(|(view, camera)| {
                        let index = scene.cameras().iter().position(|c| c.id() == camera)?;
                        Some(ViewData {
                            id: view.name().to_string(),
                            index: index as i64,
                        })
                    })
                    .collect(),
            );
        }

        if options.grid {
            doc.grid = Some(GridData {
                scale: scene.grid().scale(),
            });
        }

        doc
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn parse(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save document to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| SceneError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved scene to {}", path.display());
        Ok(())
    }

    /// Load document from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::parse(&content)?;
        tracing::info!("Loaded scene document {}", path.display());
        Ok(doc)
    }

    /// Checks everything that can be rejected before the scene is touched.
    fn validate(&self) -> Result<Vec<PendingToken<'_>>, SceneError> {
        if let Some(grid) = &self.grid {
            if !(grid.scale.is_finite() && grid.scale > 0.0) {
                return Err(SceneError::invalid(format!(
                    "grid scale must be positive, got {}",
                    grid.scale
                )));
            }
        }

        self.tokens
            .iter()
            .flatten()
            .map(|data| -> Result<PendingToken<'_>, SceneError> {
                Ok(PendingToken {
                    data,
                    statuses: StatusSet::from_bitstring(&data.statuses)?,
                })
            })
            .collect()
    }

    /// Applies the document to `scene`.
    ///
    /// With `merge` false, each section present in the document replaces the
    /// matching part of the scene; with `merge` true, tokens, images and
    /// cameras are appended instead. Scalar settings are overwritten either
    /// way. Returns the ids of the tokens and images created.
    ///
    /// View bindings with an unknown id or a camera index out of range are
    /// skipped with a warning. Any other problem is reported before the
    /// scene is modified.
    pub fn apply_to(
        &self,
        scene: &mut Scene,
        resources: &mut ResourceProvider,
        merge: bool,
    ) -> Result<Vec<ShapeId>, SceneError> {
        let pending_tokens = self.validate()?;
        let mut created = Vec::new();

        if let Some(visibility) = self.default_visibility {
            scene.default_visibility = visibility;
        }

        if self.tokens.is_some() {
            if !merge {
                scene.clear_tokens();
            }
            for pending in pending_tokens {
                let data = pending.data;
                let texture = load_texture(resources, data.texture.as_deref());
                let mut token = Token::new(scene.allocate_id(), texture);
                *token.transform_mut() = data.matrix.to_transform();
                token.name = data.name.clone();
                token.border_colour = Rgba::from(data.border_colour);
                token.border_width = data.border_width;
                token.statuses = pending.statuses;
                token.x_status = data.x_status;
                token.opacity = data.opacity;
                token.set_visibility(data.visibility);
                created.push(token.id());
                scene.insert_token(token);
            }
        }
        if let Some(locked) = self.tokens_locked {
            scene.tokens_locked = locked;
        }

        if let Some(images) = &self.images {
            if !merge {
                scene.clear_images();
            }
            for data in images {
                let texture = load_texture(resources, data.texture.as_deref());
                let mut image = BgImage::new(scene.allocate_id(), texture);
                *image.transform_mut() = data.matrix.to_transform();
                image.lock_ratio = data.lock_ratio;
                image.set_visibility(data.visibility);
                created.push(image.id());
                scene.insert_image(image);
            }
        }
        if let Some(locked) = self.images_locked {
            scene.images_locked = locked;
        }

        let mut document_cameras = Vec::new();
        if let Some(cameras) = &self.cameras {
            if !merge {
                scene.clear_cameras();
            }
            for data in cameras {
                let mut camera = Camera::new(data.name.clone());
                camera.set_position(Vec3::from_array(data.pos));
                camera.set_focal(data.focal);
                document_cameras.push(scene.add_camera(camera));
            }
        }

        if let Some(views) = &self.views {
            if !merge {
                scene.clear_views();
            }
            let targets: Vec<CameraId> = if self.cameras.is_some() {
                document_cameras
            } else {
                scene.cameras().iter().map(|c| c.id()).collect()
            };
            for view in views {
                let Some(view_id) = ViewId::from_name(&view.id) else {
                    tracing::warn!("Skipping binding for unknown view '{}'", view.id);
                    continue;
                };
                let camera = usize::try_from(view.index)
                    .ok()
                    .and_then(|i| targets.get(i).copied());
                match camera {
                    Some(camera) => {
                        scene.bind_view(view_id, camera);
                    }
                    None => tracing::warn!(
                        "Skipping view '{}': camera index {} out of range (0..{})",
                        view.id,
                        view.index,
                        targets.len()
                    ),
                }
            }
        }

        if let Some(grid) = &self.grid {
            scene.grid_mut().set_scale(grid.scale);
        }

        Ok(created)
    }
}

fn load_texture(resources: &mut ResourceProvider, key: Option<&str>) -> Option<Rc<Texture>> {
    key.filter(|k| !k.is_empty()).map(|k| resources.texture(k))
}

fn token_to_data(token: &Token) -> TokenData {
    TokenData {
        matrix: MatrixData::from_transform(token.transform()),
        texture: token.texture().map(|t| t.key().to_string()),
        name: token.name.clone(),
        border_colour: token.border_colour.to_array(),
        border_width: token.border_width,
        statuses: token.statuses.to_bitstring(),
        x_status: token.x_status,
        opacity: token.opacity,
        visibility: token.visibility(),
    }
}

fn image_to_data(image: &BgImage) -> ImageData {
    ImageData {
        texture: image.texture().map(|t| t.key().to_string()),
        matrix: MatrixData::from_transform(image.transform()),
        visibility: image.visibility(),
        lock_ratio: image.lock_ratio,
    }
}

/// Writes the whole scene to `path` and remembers the path on the scene.
pub fn save_scene(scene: &mut Scene, path: impl AsRef<Path>) -> Result<(), SceneError> {
    let path = path.as_ref();
    SceneDocument::from_scene(scene, SerializeOptions::all()).save_to_file(path)?;
    scene.file_path = Some(path.to_path_buf());
    Ok(())
}

/// Reads a scene file into a fresh scene.
pub fn load_scene(
    path: impl AsRef<Path>,
    resources: &mut ResourceProvider,
) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let doc = SceneDocument::load_from_file(path)?;
    let mut scene = Scene::new();
    doc.apply_to(&mut scene, resources, false)?;
    scene.file_path = Some(path.to_path_buf());
    Ok(scene)
}
