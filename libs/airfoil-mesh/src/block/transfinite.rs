//! # Transfinite Interpolation
//!
//! Coons-patch filling of a lattice from its four boundary curves.
//!
//! With `xi = i/(ni-1)` and `eta = j/(nj-1)`:
//!
//! ```text
//! P(i,j) = (1-xi) L(j) + xi R(j) + (1-eta) B(i) + eta T(i)
//!        - [(1-xi)(1-eta) B(0) + xi(1-eta) B(ni-1) + (1-xi)eta T(0) + xi eta T(ni-1)]
//! ```
//!
//! Boundary nodes reproduce the curves exactly.

use super::StructuredBlock;
use crate::error::{MeshError, MeshResult};
use config::constants::MERGE_RADIUS;
use glam::DVec2;
use std::ops::RangeInclusive;

/// Four boundary curves of a structured patch.
///
/// `lower` and `upper` run along i (length ni), `left` and `right` run
/// along j (length nj). Corners must coincide: `lower[0] = left[0]`,
/// `lower[ni-1] = right[0]`, `upper[0] = left[nj-1]`,
/// `upper[ni-1] = right[nj-1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Curve at j = 0
    pub lower: Vec<DVec2>,
    /// Curve at j = nj - 1
    pub upper: Vec<DVec2>,
    /// Curve at i = 0
    pub left: Vec<DVec2>,
    /// Curve at i = ni - 1
    pub right: Vec<DVec2>,
}

impl Boundary {
    fn check(&self, block: &str) -> MeshResult<(usize, usize)> {
        let ni = self.lower.len();
        let nj = self.left.len();
        if ni < 2 || nj < 2 {
            return Err(MeshError::block_shape(
                block,
                "boundary curves need at least 2 points",
            ));
        }
        if self.upper.len() != ni || self.right.len() != nj {
            return Err(MeshError::block_shape(
                block,
                format!(
                    "opposite boundary curves differ in length ({}/{} and {}/{})",
                    ni,
                    self.upper.len(),
                    nj,
                    self.right.len()
                ),
            ));
        }

        let corners = [
            ("lower-left", self.lower[0], self.left[0]),
            ("lower-right", self.lower[ni - 1], self.right[0]),
            ("upper-left", self.upper[0], self.left[nj - 1]),
            ("upper-right", self.upper[ni - 1], self.right[nj - 1]),
        ];
        for (corner, a, b) in corners {
            if a.distance(b) > MERGE_RADIUS {
                return Err(MeshError::block_shape(
                    block,
                    format!("{corner} corner mismatch: {a} vs {b}"),
                ));
            }
        }
        Ok((ni, nj))
    }
}

/// Interpolates the interior of a patch, returning row-major nodes
/// (`ni` per line, `nj` lines).
pub fn interpolate(boundary: &Boundary) -> MeshResult<Vec<DVec2>> {
    let (ni, nj) = boundary.check("transfinite")?;
    Ok(coons(boundary, ni, nj))
}

fn coons(b: &Boundary, ni: usize, nj: usize) -> Vec<DVec2> {
    let (b0, b1) = (b.lower[0], b.lower[ni - 1]);
    let (t0, t1) = (b.upper[0], b.upper[ni - 1]);

    let mut nodes = Vec::with_capacity(ni * nj);
    for j in 0..nj {
        let eta = j as f64 / (nj - 1) as f64;
        for i in 0..ni {
            let xi = i as f64 / (ni - 1) as f64;

            let node = if j == 0 {
                b.lower[i]
            } else if j == nj - 1 {
                b.upper[i]
            } else if i == 0 {
                b.left[j]
            } else if i == ni - 1 {
                b.right[j]
            } else {
                let edges = b.left[j] * (1.0 - xi)
                    + b.right[j] * xi
                    + b.lower[i] * (1.0 - eta)
                    + b.upper[i] * eta;
                let corners = b0 * ((1.0 - xi) * (1.0 - eta))
                    + b1 * (xi * (1.0 - eta))
                    + t0 * ((1.0 - xi) * eta)
                    + t1 * (xi * eta);
                edges - corners
            };
            nodes.push(node);
        }
    }
    nodes
}

impl StructuredBlock {
    /// Replaces the whole block by the patch spanned by `boundary`.
    pub fn transfinite(&mut self, boundary: &Boundary) -> MeshResult<()> {
        let (ni, nj) = boundary.check(&self.name)?;
        self.line_len = ni;
        self.nodes = coons(boundary, ni, nj);
        Ok(())
    }

    /// Re-interpolates the nodes strictly inside an index window.
    ///
    /// The window's edges, taken from the current nodes, are the boundary
    /// curves; they are left untouched.
    ///
    /// # Errors
    ///
    /// `BlockShape` when the window is empty, flat or outside the block.
    pub fn transfinite_window(
        &mut self,
        i: RangeInclusive<usize>,
        j: RangeInclusive<usize>,
    ) -> MeshResult<()> {
        let (i0, i1) = (*i.start(), *i.end());
        let (j0, j1) = (*j.start(), *j.end());
        if i1 <= i0 || j1 <= j0 || i1 >= self.line_len || j1 >= self.line_count() {
            return Err(MeshError::block_shape(
                &self.name,
                format!(
                    "window {i0}..={i1} x {j0}..={j1} does not fit a {} x {} block",
                    self.line_len,
                    self.line_count()
                ),
            ));
        }

        let boundary = Boundary {
            lower: (i0..=i1).map(|a| self.node(a, j0)).collect(),
            upper: (i0..=i1).map(|a| self.node(a, j1)).collect(),
            left: (j0..=j1).map(|b| self.node(i0, b)).collect(),
            right: (j0..=j1).map(|b| self.node(i1, b)).collect(),
        };
        let (ni, nj) = (i1 - i0 + 1, j1 - j0 + 1);
        let patch = coons(&boundary, ni, nj);

        for b in 1..nj - 1 {
            for a in 1..ni - 1 {
                self.set_node(i0 + a, j0 + b, patch[b * ni + a]);
            }
        }
        Ok(())
    }
}
