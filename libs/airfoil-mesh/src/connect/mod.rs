//! # Block Connection
//!
//! Merges structured blocks into one global quad mesh.
//!
//! ## Algorithm
//!
//! 1. Concatenate all block nodes (block order, row-major per block) and
//!    their cells, offset by the running node count
//! 2. Map every node to the lowest index within the merge radius
//! 3. Rewrite cells through that map, rejecting cells that collapse
//! 4. Renumber the referenced nodes from 0, keeping their order
//!
//! The node map survives on the mesh, so block lines can still be located
//! in the merged vertex list.

pub mod quality;
mod spatial_index;
#[cfg(test)]
mod tests;

pub use quality::MeshQuality;

use crate::block::StructuredBlock;
use crate::error::{MeshError, MeshResult};
use glam::DVec2;
use spatial_index::VertexIndex;
use std::collections::HashMap;
use tracing::{debug, info};

/// Where one block's nodes sit in the concatenated node list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    /// Block name
    pub name: String,
    /// Points per U-line
    pub line_len: usize,
    /// Number of U-lines
    pub line_count: usize,
    /// Index of node (0, 0) in the concatenated list
    pub offset: usize,
}

/// Deduplicated vertices and quad connectivity of all blocks.
#[derive(Debug, Clone)]
pub struct GlobalMesh {
    vertices: Vec<DVec2>,
    cells: Vec<[usize; 4]>,
    blocks: Vec<BlockLayout>,
    /// Concatenated node index -> merged vertex (None when unreferenced)
    node_map: Vec<Option<usize>>,
}

impl GlobalMesh {
    /// Merged vertex positions.
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Quad cells as vertex index quadruples.
    pub fn cells(&self) -> &[[usize; 4]] {
        &self.cells
    }

    /// Block layouts in assembly order.
    pub fn blocks(&self) -> &[BlockLayout] {
        &self.blocks
    }

    /// Merged vertex of node `(i, j)` of block `block`.
    ///
    /// `None` when the block or node does not exist, or the node belongs to
    /// no cell.
    pub fn vertex_index(&self, block: usize, i: usize, j: usize) -> Option<usize> {
        let layout = self.blocks.get(block)?;
        if i >= layout.line_len || j >= layout.line_count {
            return None;
        }
        self.node_map
            .get(layout.offset + j * layout.line_len + i)
            .copied()
            .flatten()
    }

    /// Maps a polyline of block nodes to merged vertex indices.
    pub fn map_nodes(
        &self,
        block: usize,
        nodes: impl IntoIterator<Item = (usize, usize)>,
    ) -> Option<Vec<usize>> {
        nodes
            .into_iter()
            .map(|(i, j)| self.vertex_index(block, i, j))
            .collect()
    }

    /// Edges used by exactly one cell, oriented as in that cell, in order of
    /// first appearance.
    pub fn boundary_edges(&self) -> Vec<[usize; 2]> {
        let mut uses: HashMap<(usize, usize), usize> = HashMap::new();
        let mut order = Vec::new();
        for cell in &self.cells {
            for k in 0..4 {
                let (a, b) = (cell[k], cell[(k + 1) % 4]);
                let count = uses.entry((a.min(b), a.max(b))).or_insert(0);
                if *count == 0 {
                    order.push([a, b]);
                }
                *count += 1;
            }
        }
        order
            .into_iter()
            .filter(|[a, b]| uses.get(&((*a).min(*b), (*a).max(*b))) == Some(&1))
            .collect()
    }

    /// Shoelace area of cell `index`, positive for counter-clockwise cells.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a cell.
    pub fn cell_area(&self, index: usize) -> f64 {
        let p = self.cells[index].map(|k| self.vertices[k]);
        0.5 * (0..4).map(|c| p[c].perp_dot(p[(c + 1) % 4])).sum::<f64>()
    }
}

/// Merges `blocks` into one mesh, fusing nodes closer than `radius`.
///
/// # Errors
///
/// - `InvalidParameter` for a non-positive radius or no cells at all
/// - `ConnectivityAmbiguity` when the radius fuses two corners of one cell
///   or a node lies within the radius of two distinct merge classes
///
/// # Example
///
/// ```rust
/// use airfoil_mesh::block::StructuredBlock;
/// use airfoil_mesh::connect::assemble;
/// use glam::DVec2;
///
/// let left = StructuredBlock::from_nodes(
///     "left", 2,
///     vec![DVec2::ZERO, DVec2::X, DVec2::Y, DVec2::ONE],
/// ).unwrap();
/// let right = StructuredBlock::from_nodes(
///     "right", 2,
///     vec![DVec2::X, DVec2::new(2.0, 0.0), DVec2::ONE, DVec2::new(2.0, 1.0)],
/// ).unwrap();
///
/// let mesh = assemble(&[left, right], 1e-6).unwrap();
/// assert_eq!(mesh.vertices().len(), 6);
/// assert_eq!(mesh.cells().len(), 2);
/// ```
pub fn assemble(blocks: &[StructuredBlock], radius: f64) -> MeshResult<GlobalMesh> {
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(MeshError::invalid("radius", format!("must be positive, got {radius}")));
    }

    let mut layouts = Vec::with_capacity(blocks.len());
    let mut raw: Vec<DVec2> = Vec::new();
    let mut raw_cells: Vec<[usize; 4]> = Vec::new();
    for block in blocks {
        let offset = raw.len();
        layouts.push(BlockLayout {
            name: block.name().to_string(),
            line_len: block.line_len(),
            line_count: block.line_count(),
            offset,
        });
        raw.extend_from_slice(block.nodes());
        raw_cells.extend(block.cells().map(|cell| cell.map(|k| k + offset)));
        debug!(block = block.name(), offset, cells = block.cell_count(), "block appended");
    }
    if raw_cells.is_empty() {
        return Err(MeshError::invalid("blocks", "no cells to connect"));
    }

    let canonical = merge_classes(&raw, radius)?;

    let mut cells = Vec::with_capacity(raw_cells.len());
    for (index, cell) in raw_cells.iter().enumerate() {
        let merged = cell.map(|k| canonical[k]);
        for a in 0..4 {
            for b in a + 1..4 {
                if merged[a] == merged[b] {
                    return Err(MeshError::ambiguity(format!(
                        "cell {index} collapses: corners {} and {} merge within radius {radius}",
                        cell[a], cell[b]
                    )));
                }
            }
        }
        cells.push(merged);
    }

    // Renumber referenced canonical nodes in their original order
    let mut referenced = vec![false; raw.len()];
    for cell in &cells {
        for &k in cell {
            referenced[k] = true;
        }
    }
    let mut renumber = vec![None; raw.len()];
    let mut vertices = Vec::new();
    for (k, used) in referenced.iter().enumerate() {
        if *used {
            renumber[k] = Some(vertices.len());
            vertices.push(raw[k]);
        }
    }
    for cell in &mut cells {
        for k in cell.iter_mut() {
            if let Some(v) = renumber[*k] {
                *k = v;
            }
        }
    }
    let node_map = canonical.iter().map(|&c| renumber[c]).collect();

    info!(
        nodes = raw.len(),
        vertices = vertices.len(),
        dropped = raw.len() - vertices.len(),
        cells = cells.len(),
        "blocks connected"
    );

    Ok(GlobalMesh {
        vertices,
        cells,
        blocks: layouts,
        node_map,
    })
}

/// Maps every node to the lowest index within `radius`.
fn merge_classes(points: &[DVec2], radius: f64) -> MeshResult<Vec<usize>> {
    let index = VertexIndex::new(points, radius);
    let neighbours: Vec<Vec<usize>> = points
        .iter()
        .map(|p| index.query_radius(*p, radius))
        .collect();

    let canonical: Vec<usize> = neighbours
        .iter()
        .enumerate()
        .map(|(k, near)| near.first().copied().unwrap_or(k))
        .collect();

    for (k, near) in neighbours.iter().enumerate() {
        if let Some(&other) = near.iter().find(|&&w| canonical[w] != canonical[k]) {
            return Err(MeshError::ambiguity(format!(
                "node {k} at {} is within radius {radius} of node {other}, \
                 which merges into a different vertex",
                points[k]
            )));
        }
    }
    Ok(canonical)
}
