//! File I/O operations (new, open, import, save) for editor state.

use super::{ensure_view_cameras, fresh_scene, EditorState};
use crate::selection;
use crate::serialization::{load_scene, save_scene, SceneDocument};
use crate::shapes::ShapeId;
use std::path::Path;
use tablekit_core::SceneError;

impl EditorState {
    /// Replace the scene with an empty one.
    pub fn new_scene(&mut self) {
        self.cancel_gesture();
        self.scene = fresh_scene(&self.config, &self.viewport);
        self.scene_name = "Untitled".to_string();
        self.is_modified = false;
        self.clear_history();
        self.resources.purge();
        tracing::info!("New scene");
    }

    /// Save to the file the scene was last opened from or saved to.
    pub fn save(&mut self) -> Result<(), SceneError> {
        let Some(path) = self.scene.file_path.clone() else {
            return Err(SceneError::NoFilePath);
        };
        self.save_as(path)
    }

    /// Save the whole scene to `path` and make it the scene's file.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        if let Err(e) = save_scene(&mut self.scene, path) {
            tracing::error!("Failed to save {}: {}", path.display(), e);
            return Err(e);
        }
        self.scene_name = name_from_path(path);
        self.is_modified = false;
        self.config.add_recent_file(path.to_path_buf());
        Ok(())
    }

    /// Load a scene file, replacing the current scene.
    ///
    /// On failure the current scene is left as it was.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let mut scene = match load_scene(path, &mut self.resources) {
            Ok(scene) => scene,
            Err(e) => {
                tracing::error!("Failed to open {}: {}", path.display(), e);
                return Err(e);
            }
        };
        ensure_view_cameras(&mut scene, &self.viewport);

        self.cancel_gesture();
        self.scene = scene;
        self.scene_name = name_from_path(path);
        self.is_modified = false;
        self.clear_history();
        self.resources.purge();
        self.config.add_recent_file(path.to_path_buf());
        tracing::info!(
            "Opened {} ({} tokens, {} images)",
            path.display(),
            self.scene.tokens().len(),
            self.scene.images().len()
        );
        Ok(())
    }

    /// Add the tokens and images of another scene file to this one.
    ///
    /// Cameras, views and scene-wide settings of the imported file are
    /// ignored. The imported shapes are selected and can be undone as one
    /// action.
    pub fn import(&mut self, path: impl AsRef<Path>) -> Result<Vec<ShapeId>, SceneError> {
        let path = path.as_ref();
        let doc = SceneDocument::load_from_file(path)?;
        let shapes_only = SceneDocument {
            tokens: doc.tokens,
            images: doc.images,
            ..SceneDocument::default()
        };

        self.cancel_gesture();
        let created = shapes_only.apply_to(&mut self.scene, &mut self.resources, true)?;
        selection::set_selection(&mut self.scene, &created);
        self.record_added("Import", &created);
        tracing::info!("Imported {} shapes from {}", created.len(), path.display());
        Ok(created)
    }

    /// Mark the scene as modified.
    pub fn mark_modified(&mut self) {
        self.is_modified = true;
    }

    /// Scene name for window titles, with a trailing `*` when unsaved.
    pub fn display_name(&self) -> String {
        if self.is_modified {
            format!("{}*", self.scene_name)
        } else {
            self.scene_name.clone()
        }
    }
}

fn name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string())
}
