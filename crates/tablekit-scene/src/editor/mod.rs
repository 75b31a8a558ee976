//! Editor state for UI integration.
//! Owns the scene and everything needed to edit it, and turns input events
//! into selection changes and undoable actions.
//!
//! This module is split into submodules:
//! - `editing`: Clipboard, deletion, attribute edits, undo/redo
//! - `file_io`: New, open, import and save

mod editing;
mod file_io;

use crate::camera::Camera;
use crate::commands::{Action, Change};
use crate::history::ActionStack;
use crate::input::{Button, InputEvent, Key, Modifiers};
use crate::render::RenderBackend;
use crate::scene::{Scene, ViewId};
use crate::selection::{self, SelectionManager};
use crate::shapes::{Shape, ShapeId};
use crate::transform::Transform2D;
use crate::viewport::Viewport;
use glam::Vec2;
use tablekit_core::ResourceProvider;
use tablekit_settings::{AdditiveModifier, Config};

/// Zoom applied per scroll-wheel notch.
const ZOOM_STEP: f32 = 1.1;
/// Padding used when framing the scene.
const FRAME_PADDING: f32 = 0.1;

/// Pointer gesture in progress, besides drag-select (which the selection
/// manager tracks).
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Dragging the selected shapes. `originals` holds each shape's
    /// transform at pointer-down. `pressed` is set when a plain press landed
    /// on an already selected shape; releasing without moving then selects
    /// only that shape.
    MovingShapes {
        anchor: Vec2,
        originals: Vec<(ShapeId, Transform2D)>,
        pressed: Option<ShapeId>,
    },
    /// Middle-button pan; `last` is the previous pointer position in pixels.
    Panning { last: Vec2 },
}

pub struct EditorState {
    pub scene: Scene,
    pub is_modified: bool,
    pub scene_name: String,
    history: ActionStack,
    resources: ResourceProvider,
    viewport: Viewport,
    active_view: ViewId,
    selection: SelectionManager,
    gesture: Gesture,
    clipboard: Option<String>,
    config: Config,
}

impl EditorState {
    pub fn new(config: Config) -> Self {
        let viewport = Viewport::default();
        let scene = fresh_scene(&config, &viewport);
        Self {
            scene,
            is_modified: false,
            scene_name: "Untitled".to_string(),
            history: ActionStack::new(config.editor.undo_depth),
            resources: ResourceProvider::new(config.resources.texture_root.clone()),
            viewport,
            active_view: ViewId::Editor,
            selection: SelectionManager::new(),
            gesture: Gesture::Idle,
            clipboard: None,
            config,
        }
    }

    pub fn history(&self) -> &ActionStack {
        &self.history
    }

    pub fn resources(&self) -> &ResourceProvider {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceProvider {
        &mut self.resources
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn active_view(&self) -> ViewId {
        self.active_view
    }

    /// Chooses which view's camera the pointer works through.
    pub fn set_active_view(&mut self, view: ViewId) {
        self.cancel_gesture();
        self.active_view = view;
        ensure_view_cameras(&mut self.scene, &self.viewport);
    }

    pub fn is_drag_selecting(&self) -> bool {
        self.selection.is_drag_selecting()
    }

    pub fn is_moving_shapes(&self) -> bool {
        matches!(self.gesture, Gesture::MovingShapes { .. })
    }

    pub fn selected_ids(&self) -> Vec<ShapeId> {
        selection::selected_ids(&self.scene)
    }

    /// The camera of the active view.
    pub fn camera(&self) -> Option<&Camera> {
        self.scene.view_camera(self.active_view)
    }

    /// World position under a pixel of the active view.
    pub fn screen_to_world(&self, screen: Vec2) -> Option<Vec2> {
        self.camera()?.screen_to_world(&self.viewport, screen)
    }

    /// Shape under a pixel of the active view.
    pub fn shape_at_screen_pos(&self, screen: Vec2) -> Option<ShapeId> {
        let camera = self.camera()?;
        self.scene.shape_at_screen_pos(camera, &self.viewport, screen)
    }

    /// World position at the centre of the active view.
    pub fn view_centre(&self) -> Vec2 {
        self.camera()
            .map(|c| c.position().truncate())
            .unwrap_or(Vec2::ZERO)
    }

    /// Fits the whole scene into the active view.
    pub fn frame_scene(&mut self) {
        let Some(bounds) = self.scene.bounds() else {
            return;
        };
        if let Some(camera) = self.scene.view_camera_mut(self.active_view) {
            camera.frame_bounds(&bounds, FRAME_PADDING);
        }
    }

    /// Renders one view.
    pub fn draw(&self, backend: &mut dyn RenderBackend, view: ViewId) {
        self.scene.draw(backend, view);
    }

    fn is_additive(&self, modifiers: Modifiers) -> bool {
        match self.config.editor.additive_modifier {
            AdditiveModifier::Shift => modifiers.shift,
            AdditiveModifier::Ctrl => modifiers.ctrl,
        }
    }

    /// Dispatches one input event. Returns true if anything visible changed.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown {
                pos,
                button,
                modifiers,
            } => self.pointer_down(pos, button, modifiers),
            InputEvent::PointerMove { pos, .. } => self.pointer_move(pos),
            InputEvent::PointerUp { button, .. } => self.pointer_up(button),
            InputEvent::Scroll { delta, pos } => self.scroll(delta, pos),
            InputEvent::Key { key, modifiers } => self.key(key, modifiers),
            InputEvent::Resize { width, height } => {
                self.resize(width, height);
                true
            }
        }
    }

    fn pointer_down(&mut self, pos: Vec2, button: Button, modifiers: Modifiers) -> bool {
        match button {
            Button::Left => {}
            Button::Middle => {
                self.cancel_gesture();
                self.gesture = Gesture::Panning { last: pos };
                return false;
            }
            Button::Right => return false,
        }

        let Some(world) = self.screen_to_world(pos) else {
            return false;
        };
        let additive = self.is_additive(modifiers);

        match self.scene.shape_at(world) {
            Some(hit) => {
                let already_selected = self.scene.shape(hit).is_some_and(|s| s.is_selected());
                // Pressing on part of the selection drags the whole selection.
                let pressed = if !already_selected || additive {
                    self.selection.select_at(&mut self.scene, world, additive);
                    None
                } else {
                    Some(hit)
                };
                self.begin_move(world, pressed);
            }
            None => {
                if !additive {
                    selection::clear_selection(&mut self.scene);
                }
                self.selection.begin_drag(&mut self.scene, world);
            }
        }
        true
    }

    fn begin_move(&mut self, anchor: Vec2, pressed: Option<ShapeId>) {
        let originals = self
            .scene
            .shapes()
            .filter(|s| s.is_selected())
            .map(|s| (s.id(), *s.transform()))
            .collect();
        self.gesture = Gesture::MovingShapes {
            anchor,
            originals,
            pressed,
        };
        tracing::debug!("Moving selection from ({}, {})", anchor.x, anchor.y);
    }

    fn pointer_move(&mut self, pos: Vec2) -> bool {
        if let Gesture::Panning { last } = self.gesture {
            let (Some(from), Some(to)) = (self.screen_to_world(last), self.screen_to_world(pos))
            else {
                return false;
            };
            if let Some(camera) = self.scene.view_camera_mut(self.active_view) {
                camera.pan_by(from - to);
            }
            self.gesture = Gesture::Panning { last: pos };
            return true;
        }

        let Some(world) = self.screen_to_world(pos) else {
            return false;
        };

        if let Gesture::MovingShapes {
            anchor, originals, ..
        } = &self.gesture
        {
            let delta = world - *anchor;
            let snap = self.config.editor.snap_to_grid;
            let grid = *self.scene.grid();
            let moves: Vec<(ShapeId, Vec2)> = originals
                .iter()
                .map(|(id, original)| {
                    let target = original.position() + delta;
                    let target = if snap {
                        grid.snap_position_for_size(original.scale().x, target)
                    } else {
                        target
                    };
                    (*id, target)
                })
                .collect();
            for (id, target) in moves {
                if let Some(shape) = self.scene.shape_mut(id) {
                    shape.transform_mut().set_position(target);
                }
            }
        }

        self.selection.hover(&mut self.scene, world);
        true
    }

    fn pointer_up(&mut self, button: Button) -> bool {
        match (button, std::mem::take(&mut self.gesture)) {
            (
                Button::Left,
                Gesture::MovingShapes {
                    originals, pressed, ..
                },
            ) => {
                let moved = self.finish_move(originals);
                if let (false, Some(id)) = (moved, pressed) {
                    selection::set_selection(&mut self.scene, &[id]);
                    tracing::debug!("Reduced selection to {:?}", id);
                }
                true
            }
            (Button::Left, _) if self.selection.is_drag_selecting() => {
                self.selection.end_drag(&mut self.scene);
                true
            }
            (Button::Middle, Gesture::Panning { .. }) => false,
            (_, gesture) => {
                self.gesture = gesture;
                false
            }
        }
    }

    /// Records a finished drag as one undoable action. Returns false if
    /// nothing moved.
    fn finish_move(&mut self, originals: Vec<(ShapeId, Transform2D)>) -> bool {
        let changes: Vec<Action> = originals
            .into_iter()
            .filter_map(|(id, old)| {
                let new = *self.scene.shape(id)?.transform();
                (new != old).then(|| Action::Transform(Change::new(id, old, new)))
            })
            .collect();
        if changes.is_empty() {
            return false;
        }
        tracing::debug!("Moved {} shapes", changes.len());
        self.perform(Action::group("Move", changes));
        true
    }

    /// Abandons any gesture, putting dragged shapes back where they were.
    pub fn cancel_gesture(&mut self) {
        if let Gesture::MovingShapes { originals, .. } = std::mem::take(&mut self.gesture) {
            for (id, original) in originals {
                if let Some(shape) = self.scene.shape_mut(id) {
                    *shape.transform_mut() = original;
                }
            }
        }
        self.selection.cancel_drag(&mut self.scene);
    }

    fn scroll(&mut self, delta: f32, pos: Vec2) -> bool {
        let before = self.screen_to_world(pos);
        let Some(camera) = self.scene.view_camera_mut(self.active_view) else {
            return false;
        };
        camera.zoom_by(ZOOM_STEP.powf(delta));
        // Keep the point under the cursor fixed.
        if let (Some(before), Some(after)) = (before, self.screen_to_world(pos)) {
            if let Some(camera) = self.scene.view_camera_mut(self.active_view) {
                camera.pan_by(before - after);
            }
        }
        true
    }

    fn key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match key {
            Key::Escape => {
                let busy = self.is_drag_selecting() || self.is_moving_shapes();
                self.cancel_gesture();
                busy
            }
            Key::Delete | Key::Backspace => self.delete_selected() > 0,
            Key::Char(c) if modifiers.ctrl => match c.to_ascii_lowercase() {
                'z' if modifiers.shift => self.redo(),
                'z' => self.undo(),
                'y' => self.redo(),
                'a' => {
                    self.select_all();
                    true
                }
                'c' => match self.copy_selected() {
                    Ok(_) => false,
                    Err(e) => {
                        tracing::error!("Copy failed: {}", e);
                        false
                    }
                },
                'v' => match self.paste() {
                    Ok(pasted) => !pasted.is_empty(),
                    Err(e) => {
                        tracing::error!("Paste failed: {}", e);
                        false
                    }
                },
                _ => false,
            },
            Key::Char(_) => false,
        }
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.viewport.set_size(width, height);
        let ids: Vec<_> = self.scene.cameras().iter().map(|c| c.id()).collect();
        for id in ids {
            if let Some(camera) = self.scene.camera_mut(id) {
                camera.set_aspect(&self.viewport);
            }
        }
    }
}

/// A new scene configured from the settings, with one camera per view.
fn fresh_scene(config: &Config, viewport: &Viewport) -> Scene {
    let mut scene = Scene::new();
    scene.grid_mut().set_scale(config.grid.scale);
    scene.grid_mut().colour = config.grid.colour;
    scene.background_colour = config.scene.background_colour;
    scene.default_visibility = config.scene.default_visibility;
    ensure_view_cameras(&mut scene, viewport);
    scene
}

/// Gives every unbound view a camera of its own, framed on the scene.
fn ensure_view_cameras(scene: &mut Scene, viewport: &Viewport) {
    for view in ViewId::ALL {
        if scene.view_camera(view).is_some() {
            continue;
        }
        let mut camera = Camera::new(match view {
            ViewId::Editor => "Editor",
            ViewId::Presentation => "Presentation",
        });
        camera.set_aspect(viewport);
        if let Some(bounds) = scene.bounds() {
            camera.frame_bounds(&bounds, FRAME_PADDING);
        }
        scene.set_view_camera(view, camera);
    }
}
