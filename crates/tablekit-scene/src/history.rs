//! Undo/redo stack.

use crate::commands::Action;
use crate::scene::Scene;
use std::collections::VecDeque;

/// Bounded undo stack plus a redo stack that is cleared by every new action.
#[derive(Debug, Clone)]
pub struct ActionStack {
    undo_stack: VecDeque<Action>,
    redo_stack: VecDeque<Action>,
    capacity: usize,
}

impl ActionStack {
    /// Creates a stack keeping at most `capacity` undoable actions (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, dropping the oldest actions if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.evict();
    }

    /// Applies `action` and records it.
    pub fn perform(&mut self, mut action: Action, scene: &mut Scene) {
        tracing::debug!("Perform: {}", action.name());
        action.redo(scene);
        self.undo_stack.push_back(action);
        self.evict();
        self.redo_stack.clear();
    }

    fn evict(&mut self) {
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Reverts the most recent action. Returns false if there was none.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(mut action) = self.undo_stack.pop_back() else {
            return false;
        };
        tracing::debug!("Undo: {}", action.name());
        action.undo(scene);
        self.redo_stack.push_back(action);
        true
    }

    /// Re-applies the most recently undone action. Returns false if there was none.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(mut action) = self.redo_stack.pop_back() else {
            return false;
        };
        tracing::debug!("Redo: {}", action.name());
        action.redo(scene);
        self.undo_stack.push_back(action);
        self.evict();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Name of the action `undo` would revert.
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.back().map(|a| a.name())
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.back().map(|a| a.name())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for ActionStack {
    fn default() -> Self {
        Self::new(100)
    }
}
