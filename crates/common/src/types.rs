use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vector::Vector2;

/// Unique identifier for a reward entity. Never reused once destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// World-space axis-aligned box reported by the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Vector2 {
        Vector2::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Anything that can report its visible world-space bounds on demand.
///
/// Camera follow and zoom live behind this trait; the streaming core only
/// ever reads the box.
pub trait Viewport {
    fn visible_bounds(&self) -> ViewBounds;
}

impl Viewport for ViewBounds {
    fn visible_bounds(&self) -> ViewBounds {
        *self
    }
}
