//! # Spatial Index for Vertex Proximity Queries
//!
//! Uniform hash grid over 2D points. With the cell size equal to the query
//! radius, every point within the radius of a query lies in the 3x3 block
//! of cells around it.
//!
//! ## Example
//!
//! ```rust,ignore
//! let index = VertexIndex::new(&points, radius);
//! let near = index.query_radius(points[0], radius);
//! ```

use glam::DVec2;
use std::collections::HashMap;

/// 2D cell coordinate for spatial hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
}

impl CellCoord {
    fn from_position(pos: DVec2, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i64,
            y: (pos.y / cell_size).floor() as i64,
        }
    }
}

/// Hash grid mapping cells to the indices of the points inside them.
#[derive(Debug)]
pub(crate) struct VertexIndex<'a> {
    points: &'a [DVec2],
    grid: HashMap<CellCoord, Vec<usize>>,
    cell_size: f64,
}

impl<'a> VertexIndex<'a> {
    /// Indexes `points` with cells of `cell_size` (must be positive).
    pub(crate) fn new(points: &'a [DVec2], cell_size: f64) -> Self {
        let mut grid: HashMap<CellCoord, Vec<usize>> = HashMap::new();
        for (k, p) in points.iter().enumerate() {
            grid.entry(CellCoord::from_position(*p, cell_size))
                .or_default()
                .push(k);
        }
        Self {
            points,
            grid,
            cell_size,
        }
    }

    /// Indices of the points within `radius` of `center`, ascending.
    ///
    /// `radius` must not exceed the cell size.
    pub(crate) fn query_radius(&self, center: DVec2, radius: f64) -> Vec<usize> {
        let cell = CellCoord::from_position(center, self.cell_size);
        let mut result = Vec::new();
        for cx in cell.x - 1..=cell.x + 1 {
            for cy in cell.y - 1..=cell.y + 1 {
                if let Some(bucket) = self.grid.get(&CellCoord { x: cx, y: cy }) {
                    result.extend(
                        bucket
                            .iter()
                            .copied()
                            .filter(|&k| self.points[k].distance(center) <= radius),
                    );
                }
            }
        }
        result.sort_unstable();
        result
    }

    /// Number of occupied cells.
    #[cfg(test)]
    pub(crate) fn cell_count(&self) -> usize {
        self.grid.len()
    }
}
