//! Viewer roles and the visibility mask.
//!
//! A shape carries a bitmask of the roles it is shown to. The host (the
//! person running the editor) and the presentation display (the players'
//! screen) are separate roles so a shape can be hidden from players while
//! staying editable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Bitmask of viewer roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Visibility(u32);

impl Visibility {
    pub const NONE: Visibility = Visibility(0);
    /// The editor window.
    pub const HOST: Visibility = Visibility(1 << 0);
    /// The player-facing display.
    pub const PRESENTATION: Visibility = Visibility(1 << 1);
    pub const ALL: Visibility = Visibility(Self::HOST.0 | Self::PRESENTATION.0);

    /// Wraps raw bits as read from a scene file. Unknown bits are kept.
    pub const fn from_bits(bits: u32) -> Self {
        Visibility(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when any role in `role` is also in this mask.
    pub const fn is_visible_to(self, role: Visibility) -> bool {
        self.0 & role.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns a copy with `role` switched on or off.
    pub fn with(self, role: Visibility, visible: bool) -> Self {
        if visible {
            Visibility(self.0 | role.0)
        } else {
            Visibility(self.0 & !role.0)
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for Visibility {
    type Output = Visibility;

    fn bitor(self, rhs: Self) -> Self::Output {
        Visibility(self.0 | rhs.0)
    }
}

impl BitOrAssign for Visibility {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Visibility {
    type Output = Visibility;

    fn bitand(self, rhs: Self) -> Self::Output {
        Visibility(self.0 & rhs.0)
    }
}

impl Not for Visibility {
    type Output = Visibility;

    fn not(self) -> Self::Output {
        Visibility(!self.0 & Self::ALL.0)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (
            self.is_visible_to(Self::HOST),
            self.is_visible_to(Self::PRESENTATION),
        ) {
            (true, true) => write!(f, "all"),
            (true, false) => write!(f, "host"),
            (false, true) => write!(f, "presentation"),
            (false, false) => write!(f, "none"),
        }
    }
}
