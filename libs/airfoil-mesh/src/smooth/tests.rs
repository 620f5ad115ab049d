//! # Smoothing Tests

use super::*;
use approx::assert_relative_eq;
use glam::DVec2;

fn grid(n: usize) -> StructuredBlock {
    let mut nodes = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            nodes.push(DVec2::new(i as f64, j as f64));
        }
    }
    StructuredBlock::from_nodes("grid", n, nodes).unwrap()
}

fn perturbed(n: usize, moves: &[((usize, usize), DVec2)]) -> StructuredBlock {
    let mut block = grid(n);
    for &((i, j), p) in moves {
        block.set_node(i, j, p);
    }
    block
}

/// Largest squared cosine over all cell corners.
fn worst_cos_squared(block: &StructuredBlock) -> f64 {
    let mut worst: f64 = 0.0;
    for cell in block.cells() {
        let p = cell.map(|k| block.nodes()[k]);
        for c in 0..4 {
            let u = p[(c + 1) % 4] - p[c];
            let v = p[(c + 3) % 4] - p[c];
            let cos = u.dot(v) / (u.length() * v.length());
            worst = worst.max(cos * cos);
        }
    }
    worst
}

/// Cell areas; cells of an x/y-aligned lattice wind clockwise, so negative.
fn signed_areas(block: &StructuredBlock) -> Vec<f64> {
    block
        .cells()
        .map(|cell| {
            let p = cell.map(|k| block.nodes()[k]);
            0.5 * (0..4).map(|c| p[c].perp_dot(p[(c + 1) % 4])).sum::<f64>()
        })
        .collect()
}

// =============================================================================
// LAPLACE AND ELLIPTIC
// =============================================================================

#[test]
fn test_laplace_restores_uniform_grid() {
    let block = perturbed(5, &[((2, 2), DVec2::new(2.6, 1.5))]);
    let report = smooth(
        &block,
        Smoother::Laplace,
        &NodeSelection::Interior,
        &SmoothParams::default(),
    )
    .unwrap();
    assert!(report.converged);
    assert!(report.residual < SMOOTHING_TOLERANCE);
    assert!(report.block.node(2, 2).distance(DVec2::new(2.0, 2.0)) < 1e-4);
}

#[test]
fn test_elliptic_restores_uniform_grid() {
    let block = perturbed(
        5,
        &[
            ((2, 2), DVec2::new(2.3, 1.8)),
            ((1, 3), DVec2::new(1.2, 2.9)),
        ],
    );
    let report = smooth(
        &block,
        Smoother::Elliptic,
        &NodeSelection::Interior,
        &SmoothParams::default(),
    )
    .unwrap();
    assert!(report.converged);
    for (a, b) in report.block.nodes().iter().zip(grid(5).nodes()) {
        assert!(a.distance(*b) < 1e-4);
    }
}

#[test]
fn test_smoothing_leaves_input_untouched() {
    let block = perturbed(4, &[((1, 1), DVec2::new(1.4, 1.4))]);
    let before = block.clone();
    let report = smooth(
        &block,
        Smoother::Laplace,
        &NodeSelection::Interior,
        &SmoothParams::default(),
    )
    .unwrap();
    assert_eq!(block, before);
    assert_ne!(report.block, before);
}

#[test]
fn test_boundary_nodes_never_move() {
    let mut block = perturbed(5, &[((2, 2), DVec2::new(2.5, 2.5))]);
    // Bend one side so the interior has something to follow
    block.set_node(0, 2, DVec2::new(-0.5, 2.0));
    let report = smooth(
        &block,
        Smoother::Elliptic,
        &NodeSelection::Window { i: 0..=4, j: 0..=4 },
        &SmoothParams::default(),
    )
    .unwrap();
    for k in 0..5 {
        for (i, j) in [(k, 0), (k, 4), (0, k), (4, k)] {
            assert_eq!(report.block.node(i, j), block.node(i, j));
        }
    }
}

// =============================================================================
// SELECTION AND CONTROL
// =============================================================================

#[test]
fn test_window_limits_moved_nodes() {
    let outside = DVec2::new(4.4, 4.3);
    let block = perturbed(7, &[((2, 2), DVec2::new(2.5, 1.6)), ((4, 4), outside)]);
    let report = smooth(
        &block,
        Smoother::Laplace,
        &NodeSelection::Window { i: 1..=3, j: 1..=3 },
        &SmoothParams::default(),
    )
    .unwrap();
    assert!(report.converged);
    assert_eq!(report.block.node(4, 4), outside);
    assert!(report.block.node(2, 2).distance(DVec2::new(2.0, 2.0)) < 1e-4);
}

#[test]
fn test_window_outside_block_rejected() {
    let block = grid(4);
    let err = smooth(
        &block,
        Smoother::Laplace,
        &NodeSelection::Window { i: 1..=4, j: 1..=2 },
        &SmoothParams::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MeshError::InvalidParameter { .. }));
}

#[test]
fn test_nonconvergence_is_reported() {
    let block = perturbed(9, &[((4, 4), DVec2::new(6.0, 6.5))]);
    let params = SmoothParams {
        iterations: 2,
        tolerance: 1e-12,
    };
    let report = smooth(&block, Smoother::Laplace, &NodeSelection::Interior, &params).unwrap();
    assert!(!report.converged);
    assert_eq!(report.iterations, 2);
    assert!(report.residual > 0.0);
    assert!(matches!(
        report.into_result(),
        Err(MeshError::SmoothingNonconvergence { iterations: 2, .. })
    ));
}

#[test]
fn test_non_positive_tolerance_rejected() {
    let params = SmoothParams {
        iterations: 10,
        tolerance: 0.0,
    };
    assert!(smooth(&grid(3), Smoother::Laplace, &NodeSelection::Interior, &params).is_err());
}

#[test]
fn test_block_without_interior_is_converged() {
    let block = StructuredBlock::from_line("flat", &[DVec2::ZERO, DVec2::X, DVec2::new(2.0, 0.0)])
        .unwrap();
    let report = smooth(
        &block,
        Smoother::Elliptic,
        &NodeSelection::Interior,
        &SmoothParams::default(),
    )
    .unwrap();
    assert!(report.converged);
    assert_eq!(report.iterations, 0);
    assert!(report.into_result().is_ok());
}

#[test]
fn test_smooth_params_defaults_from_json() {
    let params: SmoothParams = serde_json::from_str(r#"{"iterations": 5}"#).unwrap();
    assert_eq!(params.iterations, 5);
    assert_relative_eq!(params.tolerance, SMOOTHING_TOLERANCE);
}

// =============================================================================
// ANGLE-BASED
// =============================================================================

#[test]
fn test_angle_based_keeps_orthogonal_grid() {
    let block = grid(5);
    let report = smooth(
        &block,
        Smoother::AngleBased,
        &NodeSelection::Interior,
        &SmoothParams::default(),
    )
    .unwrap();
    assert!(report.converged);
    assert_eq!(report.iterations, 1);
    assert_eq!(report.block, block);
}

#[test]
fn test_angle_based_improves_skewed_node() {
    let block = perturbed(5, &[((2, 2), DVec2::new(2.35, 2.25))]);
    let before = worst_cos_squared(&block);
    let report = smooth(
        &block,
        Smoother::AngleBased,
        &NodeSelection::Interior,
        &SmoothParams::default(),
    )
    .unwrap();
    let after = worst_cos_squared(&report.block);
    assert!(after < 0.5 * before, "{after} vs {before}");
    assert!(signed_areas(&report.block).iter().all(|a| *a < 0.0));
}

#[test]
fn test_angle_based_never_folds_cells() {
    // Sheared interior
    let moves: Vec<((usize, usize), DVec2)> = (1..5)
        .flat_map(|j| (1..5).map(move |i| ((i, j), DVec2::new(i as f64 + 0.1 * j as f64, j as f64))))
        .collect();
    let block = perturbed(6, &moves);
    let params = SmoothParams {
        iterations: 20,
        tolerance: SMOOTHING_TOLERANCE,
    };
    let report = smooth(&block, Smoother::AngleBased, &NodeSelection::Interior, &params).unwrap();
    assert!(signed_areas(&block).iter().all(|a| *a < 0.0));
    assert!(signed_areas(&report.block).iter().all(|a| *a < 0.0));
}

#[test]
fn test_angle_based_keeps_edges_above_floor() {
    // Rows graded 1.6x, interior sheared
    let n = 8;
    let mut nodes = Vec::with_capacity(n * n);
    for j in 0..n {
        let y = 0.05 * (1.6f64.powi(j as i32) - 1.0);
        for i in 0..n {
            let shear = if i > 0 && i < n - 1 && j > 0 && j < n - 1 { 0.3 * y } else { 0.0 };
            nodes.push(DVec2::new(i as f64 + shear, y));
        }
    }
    let block = StructuredBlock::from_nodes("graded", n, nodes).unwrap();
    let params = SmoothParams {
        iterations: 30,
        tolerance: SMOOTHING_TOLERANCE,
    };
    let report = smooth(&block, Smoother::AngleBased, &NodeSelection::Interior, &params).unwrap();

    let interior = |i: usize, j: usize| i > 0 && i < n - 1 && j > 0 && j < n - 1;
    let floor = |i: usize, j: usize| {
        let p = block.node(i, j);
        let lmin = [(i + 1, j), (i - 1, j), (i, j + 1), (i, j - 1)]
            .iter()
            .map(|&(a, b)| block.node(a, b).distance(p))
            .fold(f64::INFINITY, f64::min);
        0.5 * lmin
    };
    for j in 0..n {
        for i in 0..n {
            for (a, b) in [(i + 1, j), (i, j + 1)] {
                if a >= n || b >= n || !(interior(i, j) || interior(a, b)) {
                    continue;
                }
                let bound = [(i, j), (a, b)]
                    .iter()
                    .filter(|&&(x, y)| interior(x, y))
                    .map(|&(x, y)| floor(x, y))
                    .fold(f64::INFINITY, f64::min);
                let edge = report.block.node(i, j).distance(report.block.node(a, b));
                assert!(edge >= bound * (1.0 - 1e-12), "edge ({i}, {j})-({a}, {b}) is {edge}");
            }
        }
    }
    assert!(signed_areas(&report.block).iter().all(|a| *a < 0.0));
}
