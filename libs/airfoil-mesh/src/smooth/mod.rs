//! # Mesh Smoothing
//!
//! Iterative relaxation of block interiors.
//!
//! ## Smoothers
//!
//! - **Laplace**: each node moves to the average of its four neighbours
//! - **Elliptic**: Winslow equations, which keep grading better than Laplace
//! - **AngleBased**: per-node Newton minimisation of corner-angle energy
//!
//! Smoothing works on a copy of the block. Block boundary nodes never move.
//! Running out of iterations is reported, not raised; use
//! [`SmoothingReport::into_result`] to turn it into an error.

mod angle;
mod elliptic;
mod laplace;
#[cfg(test)]
mod tests;

use crate::block::StructuredBlock;
use crate::error::{MeshError, MeshResult};
use config::constants::{SMOOTHING_MAX_ITERATIONS, SMOOTHING_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// Smoothing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoother {
    /// Jacobi averaging of the four orthogonal neighbours
    Laplace,
    /// Jacobi iteration of the Winslow equations
    Elliptic,
    /// Newton minimisation of the angle energy, node by node
    AngleBased,
}

/// Nodes a smoother may move.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSelection {
    /// Every node that is not on the block boundary
    #[default]
    Interior,
    /// Nodes inside an inclusive index window, minus the block boundary
    Window {
        /// Range along the U-lines
        i: RangeInclusive<usize>,
        /// Range of U-line indices
        j: RangeInclusive<usize>,
    },
}

/// Iteration controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothParams {
    /// Iteration cap
    pub iterations: usize,
    /// Convergence threshold on the largest node displacement
    pub tolerance: f64,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            iterations: SMOOTHING_MAX_ITERATIONS,
            tolerance: SMOOTHING_TOLERANCE,
        }
    }
}

/// Outcome of a smoothing run.
#[derive(Debug, Clone)]
pub struct SmoothingReport {
    /// The smoothed copy
    pub block: StructuredBlock,
    /// Iterations performed
    pub iterations: usize,
    /// Largest displacement of the last iteration
    pub residual: f64,
    /// Whether the residual dropped below the tolerance
    pub converged: bool,
}

impl SmoothingReport {
    /// Returns the block, or `SmoothingNonconvergence` if the run hit its cap.
    pub fn into_result(self) -> MeshResult<StructuredBlock> {
        if self.converged {
            Ok(self.block)
        } else {
            Err(MeshError::SmoothingNonconvergence {
                iterations: self.iterations,
                residual: self.residual,
            })
        }
    }
}

/// Smooths the selected nodes of a copy of `block`.
///
/// # Errors
///
/// `InvalidParameter` for a window outside the block or a non-positive
/// tolerance.
///
/// # Example
///
/// ```rust
/// use airfoil_mesh::block::StructuredBlock;
/// use airfoil_mesh::smooth::{smooth, NodeSelection, SmoothParams, Smoother};
/// use glam::DVec2;
///
/// let mut nodes = Vec::new();
/// for j in 0..5 {
///     for i in 0..5 {
///         nodes.push(DVec2::new(i as f64, j as f64));
///     }
/// }
/// nodes[12] = DVec2::new(2.7, 1.4);
/// let block = StructuredBlock::from_nodes("grid", 5, nodes).unwrap();
///
/// let report = smooth(&block, Smoother::Laplace, &NodeSelection::Interior, &SmoothParams::default()).unwrap();
/// assert!(report.converged);
/// assert!((report.block.node(2, 2) - DVec2::new(2.0, 2.0)).length() < 1e-4);
/// ```
pub fn smooth(
    block: &StructuredBlock,
    smoother: Smoother,
    selection: &NodeSelection,
    params: &SmoothParams,
) -> MeshResult<SmoothingReport> {
    if !(params.tolerance > 0.0) {
        return Err(MeshError::invalid("tolerance", "must be positive"));
    }
    let selected = select_nodes(block, selection)?;
    let mut work = block.clone();

    let floors = match smoother {
        Smoother::AngleBased => angle::edge_floors(&work, &selected),
        Smoother::Laplace | Smoother::Elliptic => Vec::new(),
    };

    let mut residual = 0.0;
    let mut iterations = 0;
    let mut converged = selected.is_empty();

    while !converged && iterations < params.iterations {
        residual = match smoother {
            Smoother::Laplace => laplace::sweep(&mut work, &selected),
            Smoother::Elliptic => elliptic::sweep(&mut work, &selected),
            Smoother::AngleBased => angle::sweep(&mut work, &selected, &floors),
        };
        iterations += 1;
        converged = residual < params.tolerance;
        debug!(block = work.name(), ?smoother, iterations, residual, "smoothing iteration");
    }

    if converged {
        info!(block = work.name(), ?smoother, iterations, residual, "smoothing converged");
    } else {
        warn!(block = work.name(), ?smoother, iterations, residual, "smoothing did not converge");
    }

    Ok(SmoothingReport {
        block: work,
        iterations,
        residual,
        converged,
    })
}

/// Resolves a selection to interior node coordinates, row-major.
fn select_nodes(
    block: &StructuredBlock,
    selection: &NodeSelection,
) -> MeshResult<Vec<(usize, usize)>> {
    let ni = block.line_len();
    let nj = block.line_count();
    if ni < 3 || nj < 3 {
        return Ok(Vec::new());
    }

    let (i_range, j_range) = match selection {
        NodeSelection::Interior => (1..=ni - 2, 1..=nj - 2),
        NodeSelection::Window { i, j } => {
            if i.start() > i.end() || j.start() > j.end() || *i.end() >= ni || *j.end() >= nj {
                return Err(MeshError::invalid(
                    "selection",
                    format!(
                        "window {i:?} x {j:?} does not fit a {ni} x {nj} block"
                    ),
                ));
            }
            (
                (*i.start()).max(1)..=(*i.end()).min(ni - 2),
                (*j.start()).max(1)..=(*j.end()).min(nj - 2),
            )
        }
    };

    let mut nodes = Vec::new();
    for j in j_range {
        for i in i_range.clone() {
            nodes.push((i, j));
        }
    }
    Ok(nodes)
}
