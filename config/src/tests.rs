//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_epsilon_is_small() {
    assert!(EPSILON < 1e-6, "EPSILON should be small for precision");
}

#[test]
fn test_merge_radius_larger_than_epsilon() {
    assert!(
        MERGE_RADIUS >= EPSILON,
        "MERGE_RADIUS should be >= EPSILON"
    );
}

#[test]
fn test_merge_radius_below_cell_sizes() {
    // The smallest default first cell must never be swallowed by a merge
    let first_cell = AIRFOIL_BLOCK_THICKNESS / (AIRFOIL_BLOCK_DIVISIONS as f64 * AIRFOIL_BLOCK_RATIO);
    assert!(MERGE_RADIUS < first_cell * 1e-2);
}

// =============================================================================
// CONTOUR TESTS
// =============================================================================

#[test]
fn test_contour_spline_degree() {
    assert_eq!(CONTOUR_SPLINE_DEGREE, 3);
}

#[test]
fn test_refine_tolerance_below_straight_angle() {
    assert!(DEFAULT_REFINE_TOLERANCE_DEG > 90.0);
    assert!(DEFAULT_REFINE_TOLERANCE_DEG < 180.0);
}

#[test]
fn test_refine_passes_bounded() {
    assert!(MAX_REFINE_PASSES >= 10);
    assert!(MAX_REFINE_PASSES <= 1000);
}

// =============================================================================
// TRAILING EDGE TESTS
// =============================================================================

#[test]
fn test_te_thickness_fraction_of_chord() {
    assert!(DEFAULT_TE_THICKNESS > 0.0 && DEFAULT_TE_THICKNESS < 0.05);
    assert!(DEFAULT_TE_BLEND > 0.0 && DEFAULT_TE_BLEND <= 1.0);
}

#[test]
fn test_te_refinement_segments() {
    assert!(DEFAULT_TE_NEW_SEGMENTS >= DEFAULT_TE_OLD_SEGMENTS);
    assert!(DEFAULT_TE_REFINE_RATIO >= 1.0);
}

// =============================================================================
// BLOCK TESTS
// =============================================================================

#[test]
fn test_airfoil_block_defaults() {
    assert_eq!(AIRFOIL_BLOCK_THICKNESS, 0.04);
    assert_eq!(AIRFOIL_BLOCK_DIVISIONS, 15);
    assert_eq!(AIRFOIL_BLOCK_RATIO, 3.0);
}

#[test]
fn test_tunnel_encloses_airfoil() {
    // The C-boundary must clear the chord and the boundary-layer block
    assert!(TUNNEL_HEIGHT > 1.0 + AIRFOIL_BLOCK_THICKNESS);
}

#[test]
fn test_wake_spread_is_a_fraction() {
    assert!((0.0..=1.0).contains(&WAKE_SPREAD));
    assert!(WAKE_DIVISOR_FRACTION > 0.0 && WAKE_DIVISOR_FRACTION < 1.0);
}

// =============================================================================
// SMOOTHING TESTS
// =============================================================================

#[test]
fn test_smoothing_limits() {
    assert!(SMOOTHING_TOLERANCE > 0.0);
    assert!(SMOOTHING_MAX_ITERATIONS > 0);
    assert!(ANGLE_STEP_FRACTION > 0.0 && ANGLE_STEP_FRACTION < 1.0);
}

// =============================================================================
// GROWTH_FACTOR TESTS
// =============================================================================

#[test]
fn test_growth_factor_single_division() {
    assert_eq!(growth_factor(3.0, 1), 1.0);
    assert_eq!(growth_factor(3.0, 0), 1.0);
}

#[test]
fn test_growth_factor_two_divisions_is_ratio() {
    assert!(approx_equal(growth_factor(3.0, 2), 3.0));
}

#[test]
fn test_growth_factor_compounds_to_ratio() {
    let divisions = 15;
    let factor = growth_factor(AIRFOIL_BLOCK_RATIO, divisions);
    let compounded = factor.powi(divisions as i32 - 1);
    assert!((compounded - AIRFOIL_BLOCK_RATIO).abs() < 1e-12);
}

#[test]
fn test_growth_factor_unit_ratio() {
    assert!(approx_equal(growth_factor(1.0, 10), 1.0));
}

// =============================================================================
// APPROX_EQUAL TESTS
// =============================================================================

#[test]
fn test_approx_equal_same_values() {
    assert!(approx_equal(1.0, 1.0));
    assert!(approx_equal(0.0, 0.0));
    assert!(approx_equal(-5.5, -5.5));
}

#[test]
fn test_approx_equal_within_epsilon() {
    let small_diff = EPSILON / 2.0;
    assert!(approx_equal(1.0, 1.0 + small_diff));
    assert!(approx_equal(1.0, 1.0 - small_diff));
}

#[test]
fn test_approx_equal_outside_epsilon() {
    let large_diff = EPSILON * 2.0;
    assert!(!approx_equal(1.0, 1.0 + large_diff));
    assert!(!approx_equal(1.0, 1.0 - large_diff));
}

// =============================================================================
// APPROX_ZERO TESTS
// =============================================================================

#[test]
fn test_approx_zero_exact_zero() {
    assert!(approx_zero(0.0));
}

#[test]
fn test_approx_zero_within_epsilon() {
    let small = EPSILON / 2.0;
    assert!(approx_zero(small));
    assert!(approx_zero(-small));
}

#[test]
fn test_approx_zero_non_zero_values() {
    assert!(!approx_zero(1.0));
    assert!(!approx_zero(-1.0));
    assert!(!approx_zero(0.1));
}
