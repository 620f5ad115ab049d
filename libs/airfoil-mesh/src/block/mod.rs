//! # Structured Blocks
//!
//! A block is a lattice of nodes organised in U-lines of equal length.
//! Node `(i, j)` is point `i` on U-line `j`; the V-lines are the transposed
//! view (point `j` of V-line `i` is node `(i, j)`).
//!
//! ## Storage
//!
//! Nodes live in one row-major array, U-line after U-line. V-lines are read
//! through index arithmetic, there is no second copy to keep in sync.
//!
//! ## Operations
//!
//! - **extrude**: append offset copies of a base line
//! - **redistribute**: move the nodes of one line along that line
//! - **transfinite**: fill the block (or a window) from its boundary curves

mod distribute;
mod extrude;
mod transfinite;

pub use distribute::{Distribution, LineDirection};
pub use extrude::ExtrudeDirection;
pub use transfinite::{interpolate, Boundary};

use crate::error::{MeshError, MeshResult};
use glam::DVec2;

/// A named structured lattice of 2D nodes.
///
/// # Example
///
/// ```rust
/// use airfoil_mesh::block::StructuredBlock;
/// use glam::DVec2;
///
/// let mut block = StructuredBlock::from_line("demo", &[DVec2::ZERO, DVec2::X]).unwrap();
/// block.add_line(&[DVec2::Y, DVec2::ONE]).unwrap();
/// assert_eq!(block.line_count(), 2);
/// assert_eq!(block.v_line(1), vec![DVec2::X, DVec2::ONE]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredBlock {
    name: String,
    /// Points per U-line (= number of V-lines)
    line_len: usize,
    /// Row-major nodes, U-line `j` at `j * line_len..(j + 1) * line_len`
    nodes: Vec<DVec2>,
}

impl StructuredBlock {
    /// Creates an empty block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line_len: 0,
            nodes: Vec::new(),
        }
    }

    /// Creates a block whose first U-line is `line`.
    pub fn from_line(name: impl Into<String>, line: &[DVec2]) -> MeshResult<Self> {
        let mut block = Self::new(name);
        block.add_line(line)?;
        Ok(block)
    }

    /// Creates a block from row-major nodes.
    ///
    /// # Errors
    ///
    /// `BlockShape` when `nodes` is not a whole number of lines.
    pub fn from_nodes(
        name: impl Into<String>,
        line_len: usize,
        nodes: Vec<DVec2>,
    ) -> MeshResult<Self> {
        let name = name.into();
        if line_len == 0 || nodes.len() % line_len != 0 {
            return Err(MeshError::block_shape(
                name,
                format!("{} nodes do not form lines of {line_len}", nodes.len()),
            ));
        }
        Ok(Self {
            name,
            line_len,
            nodes,
        })
    }

    /// Block name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points per U-line (the number of V-lines).
    #[inline]
    pub fn line_len(&self) -> usize {
        self.line_len
    }

    /// Number of U-lines (points per V-line).
    #[inline]
    pub fn line_count(&self) -> usize {
        if self.line_len == 0 {
            0
        } else {
            self.nodes.len() / self.line_len
        }
    }

    /// Returns true if the block has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in row-major order.
    #[inline]
    pub fn nodes(&self) -> &[DVec2] {
        &self.nodes
    }

    /// Flat index of node `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.line_len + i
    }

    /// Appends a U-line.
    ///
    /// # Errors
    ///
    /// `BlockShape` if the line is empty or its length differs from the
    /// existing lines.
    pub fn add_line(&mut self, line: &[DVec2]) -> MeshResult<()> {
        if line.is_empty() {
            return Err(MeshError::block_shape(&self.name, "cannot add an empty line"));
        }
        if self.is_empty() {
            self.line_len = line.len();
        } else if line.len() != self.line_len {
            return Err(MeshError::block_shape(
                &self.name,
                format!("line has {} points, block lines have {}", line.len(), self.line_len),
            ));
        }
        self.nodes.extend_from_slice(line);
        Ok(())
    }

    /// U-line `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= line_count()`.
    #[inline]
    pub fn u_line(&self, j: usize) -> &[DVec2] {
        &self.nodes[j * self.line_len..(j + 1) * self.line_len]
    }

    /// V-line `i`, collected from the row-major storage.
    ///
    /// # Panics
    ///
    /// Panics if `i >= line_len()`.
    pub fn v_line(&self, i: usize) -> Vec<DVec2> {
        assert!(i < self.line_len, "V-line {i} out of range");
        self.nodes
            .iter()
            .skip(i)
            .step_by(self.line_len)
            .copied()
            .collect()
    }

    /// The last U-line, if any.
    pub fn last_u_line(&self) -> Option<&[DVec2]> {
        self.line_count().checked_sub(1).map(|j| self.u_line(j))
    }

    /// The last V-line, if any.
    pub fn last_v_line(&self) -> Option<Vec<DVec2>> {
        self.line_len.checked_sub(1).map(|i| self.v_line(i))
    }

    /// Node `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if the node is outside the block.
    #[inline]
    pub fn node(&self, i: usize, j: usize) -> DVec2 {
        self.nodes[self.index(i, j)]
    }

    /// Moves node `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if the node is outside the block.
    #[inline]
    pub fn set_node(&mut self, i: usize, j: usize, position: DVec2) {
        let index = self.index(i, j);
        self.nodes[index] = position;
    }

    /// Quad cells as node-index quadruples `(i, j), (i, j+1), (i+1, j+1), (i+1, j)`.
    pub fn cells(&self) -> impl Iterator<Item = [usize; 4]> + '_ {
        let ni = self.line_len;
        let nj = self.line_count();
        (0..nj.saturating_sub(1)).flat_map(move |j| {
            (0..ni.saturating_sub(1)).map(move |i| {
                [
                    self.index(i, j),
                    self.index(i, j + 1),
                    self.index(i + 1, j + 1),
                    self.index(i + 1, j),
                ]
            })
        })
    }

    /// Number of quad cells.
    pub fn cell_count(&self) -> usize {
        self.line_len.saturating_sub(1) * self.line_count().saturating_sub(1)
    }
}
