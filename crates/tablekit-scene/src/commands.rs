//! Reversible scene mutations.
//!
//! Each [`Action`] variant names one (entity, attribute) pair and stores the
//! old and new values inline. `redo` writes the new value, `undo` the old
//! one. Targets are looked up by id every time, so an action whose shape has
//! since been deleted does nothing and logs a warning.

use crate::scene::{Scene, SceneObject};
use crate::shapes::{ShapeId, StatusSet};
use crate::transform::Transform2D;
use tablekit_core::{Rgba, Visibility};

/// Old and new value of one attribute of one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Change<T> {
    pub target: ShapeId,
    pub old: T,
    pub new: T,
}

impl<T> Change<T> {
    pub fn new(target: ShapeId, old: T, new: T) -> Self {
        Self { target, old, new }
    }
}

/// Puts a shape into the scene. `object` holds the shape while it is out
/// of the scene; it is `None` when the shape was already inserted before
/// the action was recorded.
#[derive(Debug, Clone)]
pub struct AddShape {
    pub id: ShapeId,
    pub index: usize,
    pub object: Option<SceneObject>,
}

/// Takes a shape out of the scene, keeping it for undo.
#[derive(Debug, Clone)]
pub struct RemoveShape {
    pub id: ShapeId,
    pub index: usize,
    pub object: Option<SceneObject>,
}

#[derive(Debug, Clone)]
pub struct ActionGroup {
    pub name: String,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone)]
pub enum Action {
    Transform(Change<Transform2D>),
    Visibility(Change<Visibility>),
    TokenName(Change<String>),
    TokenBorderColour(Change<Rgba>),
    TokenBorderWidth(Change<f32>),
    TokenStatuses(Change<StatusSet>),
    TokenXStatus(Change<bool>),
    TokenOpacity(Change<f32>),
    ImageLockRatio(Change<bool>),
    GridScale { old: f32, new: f32 },
    AddShape(AddShape),
    RemoveShape(RemoveShape),
    Group(ActionGroup),
}

#[derive(Clone, Copy)]
enum Direction {
    Redo,
    Undo,
}

impl Direction {
    fn pick<'a, T>(self, change: &'a Change<T>) -> &'a T {
        match self {
            Direction::Redo => &change.new,
            Direction::Undo => &change.old,
        }
    }
}

fn stale(action: &str, target: ShapeId) {
    tracing::warn!("{}: target {} no longer exists, skipping", action, target);
}

impl Action {
    /// Inserts a detached object, placing it on top of its collection.
    pub fn add(object: SceneObject, index: usize) -> Self {
        Action::AddShape(AddShape {
            id: object.id(),
            index,
            object: Some(object),
        })
    }

    /// Records a shape that is already in the scene as added.
    pub fn added(id: ShapeId, index: usize) -> Self {
        Action::AddShape(AddShape {
            id,
            index,
            object: None,
        })
    }

    pub fn remove(id: ShapeId) -> Self {
        Action::RemoveShape(RemoveShape {
            id,
            index: 0,
            object: None,
        })
    }

    pub fn group(name: impl Into<String>, actions: Vec<Action>) -> Self {
        Action::Group(ActionGroup {
            name: name.into(),
            actions,
        })
    }

    /// Display name, as shown in an Edit menu.
    pub fn name(&self) -> &str {
        match self {
            Action::Transform(_) => "Transform",
            Action::Visibility(_) => "Change Visibility",
            Action::TokenName(_) => "Rename Token",
            Action::TokenBorderColour(_) => "Change Border Colour",
            Action::TokenBorderWidth(_) => "Change Border Width",
            Action::TokenStatuses(_) => "Change Statuses",
            Action::TokenXStatus(_) => "Toggle X Status",
            Action::TokenOpacity(_) => "Change Opacity",
            Action::ImageLockRatio(_) => "Toggle Lock Ratio",
            Action::GridScale { .. } => "Change Grid Scale",
            Action::AddShape(_) => "Add Shape",
            Action::RemoveShape(_) => "Remove Shape",
            Action::Group(group) => &group.name,
        }
    }

    /// Applies the change.
    pub fn redo(&mut self, scene: &mut Scene) {
        match self {
            Action::AddShape(cmd) => {
                if let Some(object) = cmd.object.take() {
                    scene.restore_object(object, cmd.index);
                } else if !scene.contains_shape(cmd.id) {
                    stale("Add Shape", cmd.id);
                }
            }
            Action::RemoveShape(cmd) => match scene.take_object(cmd.id) {
                Some((object, index)) => {
                    cmd.object = Some(object);
                    cmd.index = index;
                }
                None => stale("Remove Shape", cmd.id),
            },
            Action::Group(group) => {
                for action in &mut group.actions {
                    action.redo(scene);
                }
            }
            _ => self.set_value(scene, Direction::Redo),
        }
    }

    /// Reverts the change.
    pub fn undo(&mut self, scene: &mut Scene) {
        match self {
            Action::AddShape(cmd) => match scene.take_object(cmd.id) {
                Some((object, index)) => {
                    cmd.object = Some(object);
                    cmd.index = index;
                }
                None => stale("Add Shape", cmd.id),
            },
            Action::RemoveShape(cmd) => {
                if let Some(object) = cmd.object.take() {
                    scene.restore_object(object, cmd.index);
                }
            }
            Action::Group(group) => {
                for action in group.actions.iter_mut().rev() {
                    action.undo(scene);
                }
            }
            _ => self.set_value(scene, Direction::Undo),
        }
    }

    fn set_value(&self, scene: &mut Scene, direction: Direction) {
        let name = self.name();
        match self {
            Action::Transform(c) => match scene.shape_mut(c.target) {
                Some(shape) => *shape.transform_mut() = *direction.pick(c),
                None => stale(name, c.target),
            },
            Action::Visibility(c) => match scene.shape_mut(c.target) {
                Some(shape) => shape.set_visibility(*direction.pick(c)),
                None => stale(name, c.target),
            },
            Action::TokenName(c) => match scene.token_mut(c.target) {
                Some(token) => token.name = direction.pick(c).clone(),
                None => stale(name, c.target),
            },
            Action::TokenBorderColour(c) => match scene.token_mut(c.target) {
                Some(token) => token.border_colour = *direction.pick(c),
                None => stale(name, c.target),
            },
            Action::TokenBorderWidth(c) => match scene.token_mut(c.target) {
                Some(token) => token.border_width = *direction.pick(c),
                None => stale(name, c.target),
            },
            Action::TokenStatuses(c) => match scene.token_mut(c.target) {
                Some(token) => token.statuses = *direction.pick(c),
                None => stale(name, c.target),
            },
            Action::TokenXStatus(c) => match scene.token_mut(c.target) {
                Some(token) => token.x_status = *direction.pick(c),
                None => stale(name, c.target),
            },
            Action::TokenOpacity(c) => match scene.token_mut(c.target) {
                Some(token) => token.opacity = *direction.pick(c),
                None => stale(name, c.target),
            },
            Action::ImageLockRatio(c) => match scene.image_mut(c.target) {
                Some(image) => image.lock_ratio = *direction.pick(c),
                None => stale(name, c.target),
            },
            Action::GridScale { old, new } => {
                let scale = match direction {
                    Direction::Redo => *new,
                    Direction::Undo => *old,
                };
                scene.grid_mut().set_scale(scale);
            }
            Action::AddShape(_) | Action::RemoveShape(_) | Action::Group(_) => {}
        }
    }
}
