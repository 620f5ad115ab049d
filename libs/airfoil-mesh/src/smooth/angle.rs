//! # Angle-Based Smoothing
//!
//! Gauss-Seidel sweep that moves one node at a time to lower the
//! orthogonality energy of the four cells around it.
//!
//! ## Energy
//!
//! For a cell `(P, A, C, B)` with `A` and `B` the edge neighbours of `P` and
//! `C` the diagonal one:
//!
//! ```text
//! T_c = (cos^2(angle at P) + cos^2(angle at A) + cos^2(angle at B)) / sigma_c
//! sigma_c = max(a, 1/a),  a = |PA| / |PB|
//! ```
//!
//! `sigma` is frozen before each node moves. Derivatives come from central
//! differences with step `1e-3 * lmin`, `lmin` being the shortest edge at
//! the node.
//!
//! ## Guards
//!
//! A step is rejected when it turns any corner of the four cells that was
//! convex into a flat or reflex one, or when it shortens an edge at the
//! node below `MIN_EDGE_FRACTION` of the node's `lmin` before smoothing.

use crate::block::StructuredBlock;
use airfoil_contour::geometry::corner_areas;
use config::constants::{ANGLE_STEP_FRACTION, EPSILON};
use glam::DVec2;

/// Step halvings tried before a node is left in place.
const MAX_HALVINGS: usize = 5;

/// Relative finite-difference step.
const DIFFERENCE_STEP: f64 = 1e-3;

/// Shortest edge a step may leave, relative to the node's starting `lmin`.
const MIN_EDGE_FRACTION: f64 = 0.5;

/// Per-node edge floors for `selected`, taken from the unsmoothed block.
pub(super) fn edge_floors(block: &StructuredBlock, selected: &[(usize, usize)]) -> Vec<f64> {
    selected
        .iter()
        .map(|&(i, j)| MIN_EDGE_FRACTION * Stencil::gather(block, i, j).lmin)
        .collect()
}

/// One Gauss-Seidel sweep, returns the largest accepted step length.
///
/// `floors` holds the edge floor of each selected node, see [`edge_floors`].
pub(super) fn sweep(
    block: &mut StructuredBlock,
    selected: &[(usize, usize)],
    floors: &[f64],
) -> f64 {
    let mut residual: f64 = 0.0;
    for (&(i, j), &floor) in selected.iter().zip(floors) {
        let mut stencil = Stencil::gather(block, i, j);
        stencil.floor = floor;
        if let Some(step) = stencil.newton_step() {
            let p = block.node(i, j) + step;
            residual = residual.max(step.length());
            block.set_node(i, j, p);
        }
    }
    residual
}

/// A node with its eight neighbours, counter-clockwise from east.
struct Stencil {
    center: DVec2,
    /// E, NE, N, NW, W, SW, S, SE
    ring: [DVec2; 8],
    sigma: [f64; 4],
    lmin: f64,
    /// Sign of the summed cell areas
    orientation: f64,
    floor: f64,
}

impl Stencil {
    fn gather(block: &StructuredBlock, i: usize, j: usize) -> Self {
        let ring = [
            block.node(i + 1, j),
            block.node(i + 1, j + 1),
            block.node(i, j + 1),
            block.node(i - 1, j + 1),
            block.node(i - 1, j),
            block.node(i - 1, j - 1),
            block.node(i, j - 1),
            block.node(i + 1, j - 1),
        ];
        let center = block.node(i, j);

        let edges = [0, 2, 4, 6].map(|k| ring[k].distance(center));
        let lmin = edges.iter().copied().fold(f64::INFINITY, f64::min);

        let mut sigma = [1.0; 4];
        for (c, s) in sigma.iter_mut().enumerate() {
            let a = edges[c];
            let b = edges[(c + 1) % 4];
            if a > EPSILON && b > EPSILON {
                *s = (a / b).max(b / a);
            }
        }

        let mut stencil = Self {
            center,
            ring,
            sigma,
            lmin,
            orientation: 1.0,
            floor: 0.0,
        };
        let area: f64 = (0..4)
            .map(|c| {
                let (a, diag, b) = stencil.cell(c);
                quad_area(center, a, diag, b)
            })
            .sum();
        if area < 0.0 {
            stencil.orientation = -1.0;
        }
        stencil
    }

    /// Cell `c` as `(A, C, B)`.
    fn cell(&self, c: usize) -> (DVec2, DVec2, DVec2) {
        (
            self.ring[2 * c],
            self.ring[2 * c + 1],
            self.ring[(2 * c + 2) % 8],
        )
    }

    fn energy(&self, p: DVec2) -> f64 {
        (0..4)
            .map(|c| {
                let (a, diag, b) = self.cell(c);
                (cos_squared(a - p, b - p)
                    + cos_squared(p - a, diag - a)
                    + cos_squared(p - b, diag - b))
                    / self.sigma[c]
            })
            .sum()
    }

    /// True when moving the center to `p` flips a convex corner or
    /// shortens an edge at the node below the floor.
    fn folds(&self, p: DVec2) -> bool {
        let flips = (0..4).any(|c| {
            let (a, diag, b) = self.cell(c);
            let before = corner_areas(&[self.center, a, diag, b]);
            let after = corner_areas(&[p, a, diag, b]);
            before
                .iter()
                .zip(&after)
                .any(|(x, y)| x * self.orientation > 0.0 && y * self.orientation <= 0.0)
        });
        flips || [0, 2, 4, 6].iter().any(|&k| self.ring[k].distance(p) < self.floor)
    }

    /// Accepted displacement for the center, if any.
    fn newton_step(&self) -> Option<DVec2> {
        if !(self.lmin > EPSILON) {
            return None;
        }
        let h = DIFFERENCE_STEP * self.lmin;
        let p = self.center;
        let f = |dx: f64, dy: f64| self.energy(p + DVec2::new(dx, dy));

        let f0 = f(0.0, 0.0);
        let (fxp, fxm) = (f(h, 0.0), f(-h, 0.0));
        let (fyp, fym) = (f(0.0, h), f(0.0, -h));

        let gradient = DVec2::new((fxp - fxm) / (2.0 * h), (fyp - fym) / (2.0 * h));
        if gradient.length() * self.lmin < EPSILON {
            return None;
        }

        let fxx = (fxp - 2.0 * f0 + fxm) / (h * h);
        let fyy = (fyp - 2.0 * f0 + fym) / (h * h);
        let fxy = (f(h, h) - f(h, -h) - f(-h, h) + f(-h, -h)) / (4.0 * h * h);
        let det = fxx * fyy - fxy * fxy;

        let mut step = if fxx > 0.0 && det > 0.0 {
            -DVec2::new(
                fyy * gradient.x - fxy * gradient.y,
                fxx * gradient.y - fxy * gradient.x,
            ) / det
        } else {
            -gradient / (fxx.abs() + fyy.abs()).max(EPSILON)
        };

        let max_step = ANGLE_STEP_FRACTION * self.lmin;
        if step.length() > max_step {
            step = step.normalize_or_zero() * max_step;
        }

        for _ in 0..=MAX_HALVINGS {
            let candidate = p + step;
            if self.energy(candidate) < f0 && !self.folds(candidate) {
                return Some(step);
            }
            step *= 0.5;
        }
        None
    }
}

/// Squared cosine of the angle between two vectors, 1 when either is degenerate.
fn cos_squared(u: DVec2, v: DVec2) -> f64 {
    let norms = u.length_squared() * v.length_squared();
    if norms < EPSILON * EPSILON {
        return 1.0;
    }
    let dot = u.dot(v);
    dot * dot / norms
}

/// Signed (shoelace) area of a quadrilateral.
fn quad_area(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> f64 {
    0.5 * (a.perp_dot(b) + b.perp_dot(c) + c.perp_dot(d) + d.perp_dot(a))
}
