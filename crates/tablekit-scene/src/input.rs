//! Input events delivered by the windowing layer.
//!
//! Positions are in framebuffer pixels with the origin at the top-left.

use glam::Vec2;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    /// A printable key, lower-cased.
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pos: Vec2,
        button: Button,
        modifiers: Modifiers,
    },
    PointerMove {
        pos: Vec2,
        modifiers: Modifiers,
    },
    PointerUp {
        pos: Vec2,
        button: Button,
        modifiers: Modifiers,
    },
    /// Wheel movement in notches; positive scrolls up (zoom in).
    Scroll { delta: f32, pos: Vec2 },
    Key { key: Key, modifiers: Modifiers },
    Resize { width: f32, height: f32 },
}
