//! Laplace smoothing: Jacobi averaging of the four orthogonal neighbours.

use crate::block::StructuredBlock;
use glam::DVec2;

/// One Jacobi sweep, returns the largest node displacement.
pub(super) fn sweep(block: &mut StructuredBlock, selected: &[(usize, usize)]) -> f64 {
    let updates: Vec<DVec2> = selected
        .iter()
        .map(|&(i, j)| {
            0.25 * (block.node(i + 1, j)
                + block.node(i - 1, j)
                + block.node(i, j + 1)
                + block.node(i, j - 1))
        })
        .collect();

    let mut residual: f64 = 0.0;
    for (&(i, j), p) in selected.iter().zip(updates) {
        residual = residual.max(p.distance(block.node(i, j)));
        block.set_node(i, j, p);
    }
    residual
}
