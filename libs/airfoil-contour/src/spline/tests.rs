//! # Spline Tests
//!
//! Fitting, refinement, curvature and trailing-edge shaping on analytic
//! shapes.

use super::refine::{adaptive_refine, refine_trailing_edge, RefineParams, TrailingEdgeRefine};
use super::trailing_edge::{apply_thickness, ThicknessSide, TrailingEdgeThickness};
use super::*;
use approx::assert_relative_eq;
use std::f64::consts::PI;

/// Symmetric teardrop with a sharp tail, `x = c^2`, `y = 0.3 c (1 - c^2)`.
///
/// Starts and ends at (1, 0), upper surface first, nose radius 0.045.
fn teardrop(n: usize) -> Vec<DVec2> {
    (0..n)
        .map(|k| {
            let c = (PI * k as f64 / (n - 1) as f64).cos();
            DVec2::new(c * c, 0.3 * c * (1.0 - c * c))
        })
        .collect()
}

fn circle(n: usize) -> Vec<DVec2> {
    (0..n)
        .map(|k| {
            let a = 2.0 * PI * k as f64 / n as f64;
            DVec2::new(a.cos(), a.sin())
        })
        .collect()
}

fn refined_teardrop() -> (BSpline, SplineSample) {
    let (spline, sample) = fit_spline(&teardrop(50), 3, 200, false).unwrap();
    let refined = adaptive_refine(&spline, &sample, &RefineParams::default()).unwrap();
    (spline, refined)
}

// =============================================================================
// FITTING
// =============================================================================

#[test]
fn test_fit_reproduces_input_at_data_parameters() {
    let points = teardrop(50);
    let (spline, sample) = fit_spline(&points, 3, 0, true).unwrap();
    assert_eq!(sample.len(), points.len());
    assert_eq!(sample.parameters(), spline.parameters());
    for (fitted, input) in sample.positions().iter().zip(&points) {
        assert!(fitted.distance(*input) < 1e-9, "{fitted} vs {input}");
    }
}

#[test]
fn test_fit_uniform_samples() {
    let (_, sample) = fit_spline(&teardrop(50), 3, 200, false).unwrap();
    assert_eq!(sample.len(), 200);
    assert_eq!(sample.parameters()[0], 0.0);
    assert_eq!(sample.parameters()[199], 1.0);
    assert!(sample.parameters().windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_fit_parameters_are_normalized_centripetal_lengths() {
    let points = [
        DVec2::ZERO,
        DVec2::new(1.0, 0.0),
        DVec2::new(1.0, 1.0),
        DVec2::new(3.0, 1.0),
    ];
    let spline = BSpline::interpolate(&points, 2).unwrap();
    // Steps 1, 1 and sqrt(2) over a total of 2 + sqrt(2)
    let total = 2.0 + 2f64.sqrt();
    assert_relative_eq!(spline.parameters()[1], 1.0 / total, epsilon = 1e-15);
    assert_relative_eq!(spline.parameters()[2], 2.0 / total, epsilon = 1e-15);
    assert_eq!(spline.parameters()[3], 1.0);
    assert_eq!(spline.knots().len(), points.len() + 3);
}

#[test]
fn test_collinear_points_give_linear_derivatives() {
    let points: Vec<DVec2> = (0..4).map(|k| DVec2::new(k as f64, 0.0)).collect();
    let spline = BSpline::interpolate(&points, 3).unwrap();
    let point = spline.evaluate(0.4);
    assert_relative_eq!(point.position.x, 1.2, epsilon = 1e-12);
    assert_relative_eq!(point.first.x, 3.0, epsilon = 1e-9);
    assert_relative_eq!(point.second.length(), 0.0, epsilon = 1e-9);
}

#[test]
fn test_fit_rejects_too_few_points() {
    let points = [DVec2::ZERO, DVec2::X, DVec2::Y];
    assert!(matches!(
        fit_spline(&points, 3, 10, false),
        Err(ContourError::SplineFit { .. })
    ));
}

#[test]
fn test_fit_rejects_duplicate_consecutive_points() {
    let mut points = teardrop(20);
    points.insert(5, points[5]);
    assert!(matches!(
        fit_spline(&points, 3, 10, false),
        Err(ContourError::SplineFit { .. })
    ));
}

#[test]
fn test_fit_rejects_self_intersecting_points() {
    let eight = [DVec2::ZERO, DVec2::ONE, DVec2::X, DVec2::Y, DVec2::new(-1.0, 0.5)];
    assert!(matches!(
        BSpline::interpolate(&eight, 3),
        Err(ContourError::SplineFit { .. })
    ));

    // A contour that turns back on itself along a straight stretch
    let back = [
        DVec2::ZERO,
        DVec2::new(1.0, 0.0),
        DVec2::new(0.5, 0.0),
        DVec2::new(0.5, 1.0),
    ];
    assert!(matches!(
        BSpline::interpolate(&back, 3),
        Err(ContourError::SplineFit { .. })
    ));
}

#[test]
fn test_fit_rejects_non_finite_points() {
    let mut points = teardrop(20);
    points[3].y = f64::INFINITY;
    assert!(BSpline::interpolate(&points, 3).is_err());
}

// =============================================================================
// SAMPLE
// =============================================================================

#[test]
fn test_sample_mutators_keep_lock_step() {
    let (spline, mut sample) = fit_spline(&teardrop(20), 3, 10, false).unwrap();
    let point = spline.evaluate(0.05);
    sample.insert(1, 0.05, point);
    assert_eq!(sample.len(), 11);
    assert_eq!(sample.parameters().len(), 11);
    assert_eq!(sample.first_derivatives().len(), 11);
    assert_eq!(sample.second_derivatives().len(), 11);
    assert_eq!(sample.point(1), Some(point));

    let (t, removed) = sample.remove(1);
    assert_eq!(t, 0.05);
    assert_eq!(removed, point);
    assert_eq!(sample.len(), 10);
    assert!(sample.point(10).is_none());
}

// =============================================================================
// ADAPTIVE REFINEMENT
// =============================================================================

#[test]
fn test_refinement_meets_tolerance() {
    let (_, refined) = refined_teardrop();
    let p = refined.positions();
    assert!(refined.len() > 200);
    for i in 1..p.len() - 1 {
        let angle = crate::geometry::angle_between(p[i - 1] - p[i], p[i + 1] - p[i]).unwrap();
        assert!(angle >= 172.0, "angle {angle} at {i}");
    }
}

#[test]
fn test_refinement_leaves_input_untouched() {
    let (spline, sample) = fit_spline(&teardrop(50), 3, 200, false).unwrap();
    let before = sample.clone();
    let _ = adaptive_refine(&spline, &sample, &RefineParams::default()).unwrap();
    assert_eq!(sample, before);
}

#[test]
fn test_refinement_samples_lie_on_the_spline() {
    let (spline, sample) = fit_spline(&teardrop(50), 3, 200, false).unwrap();
    let refined = adaptive_refine(&spline, &sample, &RefineParams::default()).unwrap();
    for (t, p) in refined.parameters().iter().zip(refined.positions()) {
        let exact = spline.evaluate(*t);
        assert!(p.distance(exact.position) < 1e-12, "{p} off the spline at t = {t}");
    }
    // Refinement only inserts; every starting parameter is still there
    for t in sample.parameters() {
        assert!(refined.parameters().contains(t), "parameter {t} was dropped");
    }
}

#[test]
fn test_refinement_keeps_parameters_sorted() {
    let (_, refined) = refined_teardrop();
    assert!(refined.parameters().windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_refinement_pass_limit() {
    let (spline, sample) = fit_spline(&teardrop(50), 3, 20, false).unwrap();
    let params = RefineParams {
        max_passes: 1,
        ..RefineParams::default()
    };
    match adaptive_refine(&spline, &sample, &params) {
        Err(ContourError::RefinementNonconvergence { passes, points }) => {
            assert_eq!(passes, 1);
            assert!(points > 20);
        }
        other => panic!("expected nonconvergence, got {other:?}"),
    }
}

#[test]
fn test_refinement_rejects_bad_tolerance() {
    let (spline, sample) = fit_spline(&teardrop(50), 3, 20, false).unwrap();
    let params = RefineParams {
        tolerance_deg: 180.0,
        ..RefineParams::default()
    };
    assert!(adaptive_refine(&spline, &sample, &params).is_err());
}

// =============================================================================
// TRAILING EDGE REFINEMENT
// =============================================================================

#[test]
fn test_trailing_edge_refinement_counts_and_symmetry() {
    let (spline, sample) = fit_spline(&teardrop(50), 3, 200, false).unwrap();
    let refine = TrailingEdgeRefine {
        old_segments: 3,
        new_segments: 8,
        ratio: 3.0,
    };
    let refined = refine_trailing_edge(&spline, &sample, &refine).unwrap();
    assert_eq!(refined.len(), 200 - 8 + 18);

    let t = refined.parameters();
    let n = t.len();
    assert_eq!(t[0], 0.0);
    assert_eq!(t[n - 1], 1.0);
    assert_relative_eq!(t[8], sample.parameters()[3], epsilon = 1e-15);
    assert!(t.windows(2).all(|w| w[1] > w[0]));

    let first = t[1] - t[0];
    let last = t[8] - t[7];
    assert_relative_eq!(last / first, 3.0, epsilon = 1e-9);
    for k in 0..n {
        assert_relative_eq!(t[k] + t[n - 1 - k], 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_trailing_edge_refinement_rejects_overlap() {
    let (spline, sample) = fit_spline(&teardrop(20), 3, 8, false).unwrap();
    let refine = TrailingEdgeRefine {
        old_segments: 4,
        new_segments: 6,
        ratio: 2.0,
    };
    assert!(refine_trailing_edge(&spline, &sample, &refine).is_err());
}

// =============================================================================
// CURVATURE
// =============================================================================

#[test]
fn test_circle_curvature_is_unit() {
    let mut points = circle(200);
    points.push(points[0]);
    let (_, sample) = fit_spline(&points, 3, 100, false).unwrap();
    let field = curvature_field(&sample);
    // Stay away from the spline ends where the closure is not enforced
    for k in 20..80 {
        assert_relative_eq!(field.curvature[k], 1.0, epsilon = 1e-3);
        assert_relative_eq!(field.radius[k], 1.0, epsilon = 1e-3);
        let center = field.center[k].unwrap();
        assert!(center.length() < 1e-3, "center {center}");
    }
}

#[test]
fn test_straight_line_has_infinite_radius() {
    let points: Vec<DVec2> = (0..5).map(|k| DVec2::new(k as f64, 2.0 * k as f64)).collect();
    let (_, sample) = fit_spline(&points, 3, 10, false).unwrap();
    let field = curvature_field(&sample);
    for k in 0..10 {
        assert!(field.curvature[k].abs() < 1e-9);
        assert!(field.radius[k].is_infinite());
        assert!(field.center[k].is_none());
        assert_relative_eq!(field.gradient[k], 2.0, epsilon = 1e-9);
    }
}

#[test]
fn test_leading_edge_is_minimum_x() {
    let (_, refined) = refined_teardrop();
    let edge = leading_edge(&refined).unwrap();
    let min_x = refined
        .positions()
        .iter()
        .map(|p| p.x)
        .fold(f64::INFINITY, f64::min);
    let nose = refined.positions()[edge.index];
    assert!(nose.x - min_x < 1e-6, "nose {nose}, min x {min_x}");
    assert!(nose.y.abs() < 1e-9, "nose {nose} is off the symmetry axis");
    assert_relative_eq!(edge.radius, 0.045, epsilon = 1e-2);
}

#[test]
fn test_gradient_handles_vertical_and_stalled_tangents() {
    let at = |first: DVec2| SplinePoint {
        position: DVec2::ZERO,
        first,
        second: DVec2::X,
    };
    let sample = SplineSample::from_points([
        (0.0, at(DVec2::new(0.0, 2.0))),
        (0.5, at(DVec2::new(0.0, -2.0))),
        (1.0, at(DVec2::ZERO)),
    ]);
    let field = curvature_field(&sample);
    assert_eq!(field.gradient[0], f64::INFINITY);
    assert_eq!(field.gradient[1], f64::NEG_INFINITY);
    assert_eq!(field.gradient[2], 0.0);
    assert!(field.curvature.iter().all(|c| c.is_finite()));
}

#[test]
fn test_leading_edge_first_on_ties() {
    let mut points = circle(40);
    points.push(points[0]);
    let spline = BSpline::interpolate(&points, 3).unwrap();
    let point = spline.evaluate(0.5);
    let sample = SplineSample::from_points([(0.1, point), (0.2, point), (0.3, point)]);
    assert_eq!(leading_edge(&sample).unwrap().index, 0);
    assert!(leading_edge(&SplineSample::new()).is_none());
}

// =============================================================================
// TRAILING EDGE THICKNESS
// =============================================================================

#[test]
fn test_thickness_separates_trailing_edge_points() {
    let (_, refined) = refined_teardrop();
    let params = TrailingEdgeThickness {
        thickness: 0.004,
        blend: 0.3,
        exponent: 3.0,
        side: ThicknessSide::Both,
    };
    let points = apply_thickness(&refined, &params).unwrap();
    assert_eq!(points.len(), refined.len());
    let gap = points[0].distance(points[points.len() - 1]);
    assert_relative_eq!(gap, 0.004, epsilon = 1e-9);
}

#[test]
fn test_thickness_leaves_front_untouched() {
    let (_, refined) = refined_teardrop();
    let points = apply_thickness(&refined, &TrailingEdgeThickness::default()).unwrap();
    for (moved, original) in points.iter().zip(refined.positions()) {
        if original.x < 0.7 {
            assert_eq!(moved, original);
        }
    }
}

#[test]
fn test_thickness_single_side_gets_full_amount() {
    let (_, refined) = refined_teardrop();
    let params = TrailingEdgeThickness {
        side: ThicknessSide::Upper,
        ..TrailingEdgeThickness::default()
    };
    let points = apply_thickness(&refined, &params).unwrap();
    let last = points.len() - 1;
    assert_relative_eq!(points[0].y - refined.positions()[0].y, 0.004, epsilon = 1e-9);
    assert_eq!(points[last], refined.positions()[last]);
}

#[test]
fn test_thickness_rejects_bad_blend() {
    let (_, refined) = refined_teardrop();
    let params = TrailingEdgeThickness {
        blend: 0.0,
        ..TrailingEdgeThickness::default()
    };
    assert!(apply_thickness(&refined, &params).is_err());
}

#[test]
fn test_settings_deserialize_with_defaults() {
    let params: RefineParams = serde_json::from_str(r#"{"points": 120}"#).unwrap();
    assert_eq!(params.points, 120);
    assert_eq!(params.tolerance_deg, 172.0);

    let thickness: TrailingEdgeThickness =
        serde_json::from_str(r#"{"side": "lower"}"#).unwrap();
    assert_eq!(thickness.side, ThicknessSide::Lower);
    assert_eq!(thickness.blend, 0.3);
}
