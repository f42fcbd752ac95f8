// SPDX-License-Identifier: MIT OR Apache-2.0
//! The object a timeline animates.
//!
//! Timelines never see a concrete scene type. Anything implementing
//! [`Target`] can be driven: position is mandatory, color and sprite are
//! optional capabilities probed when a step that needs them is queued.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// World-space position
pub type Vec3 = [f32; 3];

/// RGBA color, components in `[0, 1]`
pub type Color = [f32; 4];

/// Shared handle the host keeps for a target.
///
/// Timelines only hold a weak reference to it.
pub type TargetHandle<T> = Rc<RefCell<T>>;

/// Identifier of a sprite asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub Uuid);

impl SpriteId {
    /// Create a new random sprite ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SpriteId {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional target property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Readable/writable color
    Color,
    /// Readable/writable sprite
    Sprite,
}

impl Capability {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Sprite => "sprite",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Object a timeline reads and writes
pub trait Target {
    /// Current position
    fn position(&self) -> Vec3;

    /// Move to a new position
    fn set_position(&mut self, position: Vec3);

    /// Current color, `None` if the target has no color
    fn color(&self) -> Option<&Color> {
        None
    }

    /// Mutable color, `None` if the target has no color
    fn color_mut(&mut self) -> Option<&mut Color> {
        None
    }

    /// Current sprite, `None` if the target has no sprite slot
    fn sprite(&self) -> Option<&SpriteId> {
        None
    }

    /// Mutable sprite slot, `None` if the target has no sprite slot
    fn sprite_mut(&mut self) -> Option<&mut SpriteId> {
        None
    }

    /// Request permanent removal
    fn remove(&mut self);

    /// Whether removal has been requested
    fn is_removed(&self) -> bool;

    /// Check whether an optional capability is present
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Color => self.color().is_some(),
            Capability::Sprite => self.sprite().is_some(),
        }
    }
}
