//! Shared types for the dive world.
//!
//! # Invariants
//! - Two positions share a `CellCoord` iff they fall in the same axis-aligned
//!   `grid_size × grid_size` cell.
//! - Vector arithmetic is total over finite inputs; nothing is normalized.

mod math;
mod types;
mod vector;

pub use math::{MathError, remap};
pub use types::{EntityId, ViewBounds, Viewport};
pub use vector::{CellCoord, Vector2};

pub fn crate_info() -> &'static str {
    "dive-common v0.1.0"
}
