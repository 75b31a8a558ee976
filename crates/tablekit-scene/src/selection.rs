//! Click, hover and rectangle (drag) selection.
//!
//! Selection and highlight live as flags on the shapes themselves. The
//! manager only tracks whether a drag-select is in progress and which
//! overlay draws its rectangle.
//!
//! ```text
//! Idle --pointer down on empty space--> DragSelecting
//! DragSelecting --pointer move--> DragSelecting (preview highlight)
//! DragSelecting --pointer up / cancel--> Idle
//! ```

use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};
use glam::Vec2;
use std::collections::HashSet;
use tablekit_core::Rgba;

/// Fill colour of the drag-select rectangle.
pub const DRAG_SELECT_COLOUR: Rgba = Rgba::new(0.3, 0.6, 1.0, 0.25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectState {
    #[default]
    Idle,
    DragSelecting {
        overlay: ShapeId,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    state: SelectState,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectState {
        self.state
    }

    pub fn is_drag_selecting(&self) -> bool {
        matches!(self.state, SelectState::DragSelecting { .. })
    }

    /// Selects the topmost unlocked shape at `point`.
    ///
    /// Without `additive` the previous selection is cleared first. Returns
    /// the hit shape; when nothing is hit the selection is left unchanged.
    pub fn select_at(&mut self, scene: &mut Scene, point: Vec2, additive: bool) -> Option<ShapeId> {
        let hit = scene.shape_at(point)?;
        if !additive {
            clear_selection(scene);
        }
        if let Some(shape) = scene.shape_mut(hit) {
            shape.set_selected(true);
        }
        tracing::debug!("Selected {} (additive: {})", hit, additive);
        Some(hit)
    }

    /// Handles a primary-button press: selects the shape under `point`, or
    /// starts a drag-select when there is none.
    pub fn pointer_down(&mut self, scene: &mut Scene, point: Vec2, additive: bool) -> Option<ShapeId> {
        match self.select_at(scene, point, additive) {
            Some(hit) => Some(hit),
            None => {
                self.begin_drag(scene, point);
                None
            }
        }
    }

    /// Starts a drag-select with both corners at `point`.
    pub fn begin_drag(&mut self, scene: &mut Scene, point: Vec2) {
        self.cancel_drag(scene);
        let overlay = scene.add_overlay(point, DRAG_SELECT_COLOUR);
        self.state = SelectState::DragSelecting { overlay };
        tracing::debug!("Drag-select started at ({}, {})", point.x, point.y);
    }

    /// Moves the free corner and previews the result by highlighting every
    /// shape inside the rectangle. Selection is not touched.
    pub fn update_drag(&mut self, scene: &mut Scene, point: Vec2) {
        let SelectState::DragSelecting { overlay } = self.state else {
            return;
        };
        let Some(rect) = scene.overlay_mut(overlay) else {
            self.state = SelectState::Idle;
            return;
        };
        rect.set_end(point);
        let (lo, hi) = (rect.min(), rect.max());

        let inside: HashSet<ShapeId> = scene.shapes_in_bounds(lo, hi).into_iter().collect();
        for shape in scene.shapes_mut() {
            let highlighted = inside.contains(&shape.id());
            shape.set_highlighted(highlighted);
        }
    }

    /// Finishes a drag-select, adding every shape inside the rectangle to the
    /// selection. Returns the shapes that were inside.
    pub fn end_drag(&mut self, scene: &mut Scene) -> Vec<ShapeId> {
        let SelectState::DragSelecting { overlay } = self.state else {
            return Vec::new();
        };
        self.state = SelectState::Idle;

        let Some(rect) = scene.remove_overlay(overlay) else {
            return Vec::new();
        };
        let found = scene.shapes_in_bounds(rect.min(), rect.max());
        for id in &found {
            if let Some(shape) = scene.shape_mut(*id) {
                shape.set_selected(true);
            }
        }
        clear_highlight(scene);
        tracing::debug!("Drag-select finished with {} shapes", found.len());
        found
    }

    /// Abandons a drag-select without changing the selection.
    pub fn cancel_drag(&mut self, scene: &mut Scene) {
        if let SelectState::DragSelecting { overlay } = self.state {
            scene.remove_overlay(overlay);
            clear_highlight(scene);
            tracing::debug!("Drag-select cancelled");
        }
        self.state = SelectState::Idle;
    }

    /// Highlights exactly one shape: the topmost unlocked one under `point`.
    /// While drag-selecting the rectangle preview owns the highlight instead.
    pub fn hover(&mut self, scene: &mut Scene, point: Vec2) -> Option<ShapeId> {
        if self.is_drag_selecting() {
            self.update_drag(scene, point);
            return None;
        }
        let hit = scene.shape_at(point);
        for shape in scene.shapes_mut() {
            let highlighted = Some(shape.id()) == hit;
            shape.set_highlighted(highlighted);
        }
        hit
    }
}

/// Ids of all selected shapes, tokens first, each in draw order.
pub fn selected_ids(scene: &Scene) -> Vec<ShapeId> {
    scene
        .shapes()
        .filter(|s| s.is_selected())
        .map(|s| s.id())
        .collect()
}

pub fn clear_selection(scene: &mut Scene) {
    for shape in scene.shapes_mut() {
        shape.set_selected(false);
    }
}

pub fn clear_highlight(scene: &mut Scene) {
    for shape in scene.shapes_mut() {
        shape.set_highlighted(false);
    }
}

/// Selects every shape in the unlocked collections.
pub fn select_all(scene: &mut Scene) {
    let (tokens_locked, images_locked) = (scene.tokens_locked, scene.images_locked);
    let ids: Vec<ShapeId> = scene
        .tokens()
        .iter()
        .filter(|_| !tokens_locked)
        .map(|t| t.id())
        .chain(scene.images().iter().filter(|_| !images_locked).map(|i| i.id()))
        .collect();
    for id in ids {
        if let Some(shape) = scene.shape_mut(id) {
            shape.set_selected(true);
        }
    }
}

/// Replaces the selection with exactly `ids`.
pub fn set_selection(scene: &mut Scene, ids: &[ShapeId]) {
    let wanted: HashSet<ShapeId> = ids.iter().copied().collect();
    for shape in scene.shapes_mut() {
        let selected = wanted.contains(&shape.id());
        shape.set_selected(selected);
    }
}
