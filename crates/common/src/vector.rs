use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A mutable 2D world coordinate.
///
/// `Copy`, so "cloning" is a plain copy. Arithmetic goes through the
/// operator traits; the in-place operations return `&mut Self` so they chain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn set(&mut self, x: f32, y: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Component-wise floor, in place.
    pub fn floor(&mut self) -> &mut Self {
        self.x = self.x.floor();
        self.y = self.y.floor();
        self
    }

    /// Component-wise floor, by value.
    pub fn floored(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: Vector2) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }

    /// Integer key of the floored components, clamped to
    /// `[-CellCoord::LIMIT, CellCoord::LIMIT]`. Collision-free for positions
    /// whose floors lie inside that range; anything further out shares the
    /// boundary cell.
    pub fn cell_key(&self) -> CellCoord {
        let f = self.floored();
        CellCoord::new(CellCoord::clamp_axis(f.x), CellCoord::clamp_axis(f.y))
    }

    /// Cell containing this position on a grid of `grid_size` squares.
    pub fn to_cell(&self, grid_size: f32) -> CellCoord {
        (*self / grid_size).cell_key()
    }

    /// Seek toward `target` by at most `max_step`.
    ///
    /// With a `slowdown_radius`, the step shrinks linearly once the distance
    /// drops below that radius, giving an eased approach. The step never
    /// carries the vector past `target`.
    pub fn reach(
        &mut self,
        target: Vector2,
        max_step: f32,
        slowdown_radius: Option<f32>,
    ) -> &mut Self {
        let delta = target.as_vec2() - self.as_vec2();
        let dist = delta.length();
        if dist == 0.0 || max_step <= 0.0 {
            return self;
        }

        let mut step = max_step;
        if let Some(radius) = slowdown_radius {
            if radius > 0.0 && dist < radius {
                step *= dist / radius;
            }
        }

        if step >= dist {
            *self = target;
        } else {
            *self = (self.as_vec2() + delta * (step / dist)).into();
        }
        self
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Vector2 {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for Vec2 {
    fn from(v: Vector2) -> Self {
        v.as_vec2()
    }
}

impl From<(f32, f32)> for Vector2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vector2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add<f32> for Vector2 {
    type Output = Self;
    fn add(self, rhs: f32) -> Self {
        Self::new(self.x + rhs, self.y + rhs)
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<f32> for Vector2 {
    type Output = Self;
    fn sub(self, rhs: f32) -> Self {
        Self::new(self.x - rhs, self.y - rhs)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vector2 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl AddAssign<f32> for Vector2 {
    fn add_assign(&mut self, rhs: f32) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl SubAssign<f32> for Vector2 {
    fn sub_assign(&mut self, rhs: f32) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vector2 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vector2 {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

/// An integer cell coordinate on the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    /// Largest cell index on either axis. At this distance an f32 still
    /// resolves an eighth of a cell, so every cell keeps distinct interior
    /// points.
    pub const LIMIT: i32 = 1 << 20;

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp a floored axis value into the cell range.
    pub fn clamp_axis(value: f32) -> i32 {
        let limit = Self::LIMIT as f32;
        value.clamp(-limit, limit) as i32
    }

    /// World-space top-left corner of this cell.
    pub fn origin(&self, grid_size: f32) -> Vector2 {
        Vector2::new(self.x as f32, self.y as f32) * grid_size
    }

    /// Every cell in the inclusive rectangle, row by row. Empty when
    /// `bottom_right` lies above or left of `top_left`.
    pub fn rect(top_left: CellCoord, bottom_right: CellCoord) -> impl Iterator<Item = CellCoord> {
        (top_left.y..=bottom_right.y)
            .flat_map(move |y| (top_left.x..=bottom_right.x).map(move |x| CellCoord::new(x, y)))
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}
