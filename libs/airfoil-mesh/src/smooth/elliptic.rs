//! Elliptic (Winslow) smoothing.
//!
//! Solves `g11 P_xixi - 2 g12 P_xieta + g22 P_etaeta = 0` by Jacobi
//! iteration, with
//!
//! ```text
//! g11 = x_eta^2 + y_eta^2
//! g22 = x_xi^2 + y_xi^2
//! g12 = x_xi x_eta + y_xi y_eta
//! ```
//!
//! from central differences on the current nodes.

use crate::block::StructuredBlock;
use config::constants::EPSILON;
use glam::DVec2;

/// One Jacobi sweep, returns the largest `|dx| + |dy|`.
pub(super) fn sweep(block: &mut StructuredBlock, selected: &[(usize, usize)]) -> f64 {
    let updates: Vec<Option<DVec2>> = selected
        .iter()
        .map(|&(i, j)| winslow_update(block, i, j))
        .collect();

    let mut residual: f64 = 0.0;
    for (&(i, j), p) in selected.iter().zip(updates) {
        let Some(p) = p else { continue };
        let delta = p - block.node(i, j);
        residual = residual.max(delta.x.abs() + delta.y.abs());
        block.set_node(i, j, p);
    }
    residual
}

fn winslow_update(block: &StructuredBlock, i: usize, j: usize) -> Option<DVec2> {
    let east = block.node(i + 1, j);
    let west = block.node(i - 1, j);
    let north = block.node(i, j + 1);
    let south = block.node(i, j - 1);

    let d_xi = 0.5 * (east - west);
    let d_eta = 0.5 * (north - south);

    let g11 = d_eta.length_squared();
    let g22 = d_xi.length_squared();
    let g12 = d_xi.dot(d_eta);

    let denominator = 2.0 * (g11 + g22);
    if denominator < EPSILON {
        return None;
    }

    let cross = block.node(i + 1, j + 1) - block.node(i + 1, j - 1) - block.node(i - 1, j + 1)
        + block.node(i - 1, j - 1);

    Some((g11 * (east + west) + g22 * (north + south) - 0.5 * g12 * cross) / denominator)
}
