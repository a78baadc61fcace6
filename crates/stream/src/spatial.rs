use std::collections::HashMap;

use dive_common::{CellCoord, Vector2};

use crate::error::{StreamError, StreamResult};

/// Uniform-grid spatial index.
///
/// Items are bucketed by the cell of their position at insertion time, as
/// reported by the `locate` accessor. The index does not follow items that
/// move: callers remove, move, then re-add. Queries are broad-phase over
/// cells, then narrow-phase on exact distance where a radius is involved.
pub struct SpatialIndex<T, F = fn(&T) -> Vector2> {
    grid_size: f32,
    locate: F,
    cells: HashMap<CellCoord, Vec<T>>,
}

impl<T, F> SpatialIndex<T, F>
where
    F: Fn(&T) -> Vector2,
{
    /// Create an empty index with square cells of side `grid_size`.
    pub fn new(grid_size: f32, locate: F) -> StreamResult<Self> {
        if !(grid_size.is_finite() && grid_size > 0.0) {
            return Err(StreamError::InvalidGridSize(grid_size));
        }
        Ok(Self {
            grid_size,
            locate,
            cells: HashMap::new(),
        })
    }

    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// Convert a world position to its cell coordinate.
    pub fn position_to_cell(&self, pos: Vector2) -> CellCoord {
        pos.to_cell(self.grid_size)
    }

    fn cell_of(&self, item: &T) -> CellCoord {
        self.position_to_cell((self.locate)(item))
    }

    /// Append `item` to the bucket of its current cell. Adding the same item
    /// twice stores it twice.
    pub fn add(&mut self, item: T) {
        let coord = self.cell_of(&item);
        self.cells.entry(coord).or_default().push(item);
    }

    /// Remove the first item equal to `item` from the bucket of `item`'s
    /// current cell, returning it. `None` when absent.
    pub fn remove(&mut self, item: &T) -> Option<T>
    where
        T: PartialEq,
    {
        let coord = self.cell_of(item);
        let bucket = self.cells.get_mut(&coord)?;
        let idx = bucket.iter().position(|other| other == item)?;
        let removed = bucket.remove(idx);
        if bucket.is_empty() {
            self.cells.remove(&coord);
        }
        Some(removed)
    }

    /// Bucket for the cell containing `pos`.
    pub fn cell_at(&self, pos: Vector2) -> &[T] {
        self.cell(self.position_to_cell(pos))
    }

    /// Bucket for a cell coordinate.
    pub fn cell(&self, coord: CellCoord) -> &[T] {
        self.cells.get(&coord).map(Vec::as_slice).unwrap_or_default()
    }

    /// Detach a whole bucket from the index.
    pub fn take_cell(&mut self, coord: CellCoord) -> Vec<T> {
        self.cells.remove(&coord).unwrap_or_default()
    }

    /// Every item in the inclusive cell rectangle `top_left..=bottom_right`.
    pub fn box_query(&self, top_left: CellCoord, bottom_right: CellCoord) -> Vec<&T> {
        CellCoord::rect(top_left, bottom_right)
            .filter_map(|coord| self.cells.get(&coord))
            .flatten()
            .collect()
    }

    /// Items in every cell touched by a `size × size` square centred on `center`.
    pub fn nearby(&self, center: Vector2, size: f32) -> Vec<&T> {
        let half = size / 2.0;
        self.box_query(
            self.position_to_cell(center - half),
            self.position_to_cell(center + half),
        )
    }

    /// Items whose exact distance to `center` is at most `radius`.
    pub fn radius_query(&self, center: Vector2, radius: f32) -> Vec<&T> {
        self.nearby(center, radius * 2.0)
            .into_iter()
            .filter(|item| (self.locate)(*item).distance(center) <= radius)
            .collect()
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of stored items across all cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.values().flatten()
    }
}

impl<T: std::fmt::Debug, F> std::fmt::Debug for SpatialIndex<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("grid_size", &self.grid_size)
            .field("cells", &self.cells.len())
            .finish()
    }
}
