//! Editing operations: undo/redo, clipboard, deletion, shape creation and
//! attribute changes. Every change to the scene goes through `perform` so
//! it lands on the undo stack.

use super::EditorState;
use crate::commands::{Action, Change};
use crate::grid::SizeCategory;
use crate::scene::SceneObject;
use crate::selection;
use crate::serialization::{SceneDocument, SerializeOptions};
use crate::shapes::{BgImage, Shape, ShapeId, StatusMarker, Token};
use glam::Vec2;
use tablekit_core::{BuiltinTexture, Rgba, SceneError, Visibility};

impl EditorState {
    /// Applies an action, records it and marks the scene modified.
    pub fn perform(&mut self, action: Action) {
        self.history.perform(action, &mut self.scene);
        self.mark_modified();
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let undone = self.history.undo(&mut self.scene);
        if undone {
            self.mark_modified();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let redone = self.history.redo(&mut self.scene);
        if redone {
            self.mark_modified();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ---- Selection ----

    pub fn select_all(&mut self) {
        selection::select_all(&mut self.scene);
    }

    pub fn clear_selection(&mut self) {
        selection::clear_selection(&mut self.scene);
    }

    pub fn selected_count(&self) -> usize {
        self.scene.shapes().filter(|s| s.is_selected()).count()
    }

    /// Locks or unlocks all tokens. Locking drops them from the selection.
    pub fn set_tokens_locked(&mut self, locked: bool) {
        if self.scene.tokens_locked == locked {
            return;
        }
        self.scene.tokens_locked = locked;
        if locked {
            let ids: Vec<ShapeId> = self.scene.tokens().iter().map(|t| t.id()).collect();
            self.deselect(&ids);
        }
        self.mark_modified();
    }

    /// Locks or unlocks all images. Locking drops them from the selection.
    pub fn set_images_locked(&mut self, locked: bool) {
        if self.scene.images_locked == locked {
            return;
        }
        self.scene.images_locked = locked;
        if locked {
            let ids: Vec<ShapeId> = self.scene.images().iter().map(|i| i.id()).collect();
            self.deselect(&ids);
        }
        self.mark_modified();
    }

    fn deselect(&mut self, ids: &[ShapeId]) {
        for id in ids {
            if let Some(shape) = self.scene.shape_mut(*id) {
                shape.set_selected(false);
                shape.set_highlighted(false);
            }
        }
    }

    // ---- Clipboard and deletion ----

    /// Deletes the selected shapes as one undoable action. Returns how many
    /// were deleted.
    pub fn delete_selected(&mut self) -> usize {
        self.cancel_gesture();
        let ids = selection::selected_ids(&self.scene);
        if ids.is_empty() {
            return 0;
        }
        let count = ids.len();
        self.perform(Action::group(
            "Delete",
            ids.into_iter().map(Action::remove).collect(),
        ));
        count
    }

    /// Copies the selected shapes to the editor's clipboard. Returns how
    /// many were copied; with nothing selected the clipboard is kept.
    pub fn copy_selected(&mut self) -> Result<usize, SceneError> {
        let doc = SceneDocument::from_scene(&self.scene, SerializeOptions::selection());
        let count =
            doc.tokens.as_ref().map_or(0, Vec::len) + doc.images.as_ref().map_or(0, Vec::len);
        if count == 0 {
            return Ok(0);
        }
        self.clipboard = Some(doc.to_json()?);
        tracing::debug!("Copied {} shapes", count);
        Ok(count)
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Pastes the clipboard one grid cell down and right of the originals
    /// and selects the pasted shapes.
    pub fn paste(&mut self) -> Result<Vec<ShapeId>, SceneError> {
        let Some(json) = &self.clipboard else {
            return Ok(Vec::new());
        };
        let doc = SceneDocument::parse(json)?;
        self.cancel_gesture();

        let created = doc.apply_to(&mut self.scene, &mut self.resources, true)?;
        let cell = self.scene.grid().scale();
        for id in &created {
            if let Some(shape) = self.scene.shape_mut(*id) {
                shape.transform_mut().offset(Vec2::new(cell, -cell));
            }
        }
        selection::set_selection(&mut self.scene, &created);
        self.record_added("Paste", &created);
        Ok(created)
    }

    /// Records shapes that are already in the scene as one undoable addition.
    pub(super) fn record_added(&mut self, name: &str, ids: &[ShapeId]) {
        if ids.is_empty() {
            return;
        }
        let actions = ids
            .iter()
            .filter_map(|id| Some(Action::added(*id, self.scene.draw_index(*id)?)))
            .collect();
        self.perform(Action::group(name, actions));
    }

    // ---- Creation ----

    /// Adds a one-cell token at the centre of the active view, snapped to
    /// the grid. `texture` is a texture key; `None` uses the built-in portrait.
    pub fn add_token_at_view_centre(&mut self, texture: Option<&str>) -> ShapeId {
        let texture = match texture {
            Some(key) => self.resources.texture(key),
            None => self.resources.builtin(BuiltinTexture::Token),
        };
        let grid = *self.scene.grid();
        let size = grid.snap_category(SizeCategory::Medium);

        let mut token = Token::new(self.scene.allocate_id(), Some(texture));
        token.set_visibility(self.scene.default_visibility);
        token.transform_mut().set_uniform_scale(size);
        token
            .transform_mut()
            .set_position(grid.snap_position_for_size(size, self.view_centre()));

        let id = token.id();
        let index = self.scene.tokens().len();
        self.perform(Action::add(SceneObject::Token(token), index));
        id
    }

    /// Adds a background image at the centre of the active view.
    pub fn add_image_at_view_centre(&mut self, texture: Option<&str>) -> ShapeId {
        let texture = match texture {
            Some(key) => self.resources.texture(key),
            None => self.resources.builtin(BuiltinTexture::Image),
        };
        let mut image = BgImage::new(self.scene.allocate_id(), Some(texture));
        image.set_visibility(self.scene.default_visibility);
        image.transform_mut().set_position(self.view_centre());

        let id = image.id();
        let index = self.scene.images().len();
        self.perform(Action::add(SceneObject::Image(image), index));
        id
    }

    // ---- Attribute edits ----

    fn edit_token<T: PartialEq>(
        &mut self,
        id: ShapeId,
        read: impl Fn(&Token) -> T,
        new: T,
        wrap: fn(Change<T>) -> Action,
    ) -> bool {
        let Some(token) = self.scene.token(id) else {
            return false;
        };
        let old = read(token);
        if old == new {
            return false;
        }
        self.perform(wrap(Change::new(id, old, new)));
        true
    }

    pub fn set_token_name(&mut self, id: ShapeId, name: impl Into<String>) -> bool {
        self.edit_token(id, |t| t.name.clone(), name.into(), Action::TokenName)
    }

    pub fn set_token_border_colour(&mut self, id: ShapeId, colour: Rgba) -> bool {
        self.edit_token(id, |t| t.border_colour, colour, Action::TokenBorderColour)
    }

    pub fn set_token_border_width(&mut self, id: ShapeId, width: f32) -> bool {
        self.edit_token(id, |t| t.border_width, width.max(0.0), Action::TokenBorderWidth)
    }

    pub fn toggle_token_status(&mut self, id: ShapeId, marker: StatusMarker) -> bool {
        let Some(current) = self.scene.token(id).map(|t| t.statuses) else {
            return false;
        };
        self.edit_token(id, |t| t.statuses, current.toggled(marker), Action::TokenStatuses)
    }

    pub fn set_token_x_status(&mut self, id: ShapeId, x_status: bool) -> bool {
        self.edit_token(id, |t| t.x_status, x_status, Action::TokenXStatus)
    }

    /// Opacity is clamped to `0.0..=1.0`.
    pub fn set_token_opacity(&mut self, id: ShapeId, opacity: f32) -> bool {
        self.edit_token(id, |t| t.opacity, opacity.clamp(0.0, 1.0), Action::TokenOpacity)
    }

    pub fn set_image_lock_ratio(&mut self, id: ShapeId, lock_ratio: bool) -> bool {
        let Some(old) = self.scene.image(id).map(|i| i.lock_ratio) else {
            return false;
        };
        if old == lock_ratio {
            return false;
        }
        self.perform(Action::ImageLockRatio(Change::new(id, old, lock_ratio)));
        true
    }

    /// Shows or hides every selected shape for one viewer role.
    pub fn set_selected_visible_to(&mut self, role: Visibility, visible: bool) -> bool {
        let actions: Vec<Action> = self
            .scene
            .shapes()
            .filter(|s| s.is_selected())
            .filter_map(|s| {
                let old = s.visibility();
                let new = old.with(role, visible);
                (old != new).then(|| Action::Visibility(Change::new(s.id(), old, new)))
            })
            .collect();
        if actions.is_empty() {
            return false;
        }
        self.perform(Action::group("Change Visibility", actions));
        true
    }

    /// Changes the grid cell size. Non-positive or non-finite sizes are ignored.
    pub fn set_grid_scale(&mut self, scale: f32) -> bool {
        let old = self.scene.grid().scale();
        if !(scale.is_finite() && scale > 0.0) || scale == old {
            return false;
        }
        self.perform(Action::GridScale { old, new: scale });
        true
    }
}
