//! # Configuration Constants
//!
//! Centralized constants for the airfoil meshing pipeline. Every tolerance,
//! iteration cap and default block parameter is defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison and merge tolerances
//! - **Contour**: Spline fitting and adaptive refinement defaults
//! - **Trailing Edge**: Thickness blending and refinement defaults
//! - **Blocks**: Default airfoil, trailing-edge, tunnel and wake block layout
//! - **Smoothing**: Iteration caps and convergence tolerances
//! - **Export**: Writer parameters

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance, e.g. when detecting a closed (sharp) trailing edge
/// or a degenerate spline segment.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Radius used when merging block nodes into the global mesh.
///
/// Nodes of neighbouring blocks that lie within this distance of each other
/// are treated as one vertex. Coordinates are chord-normalized, so the
/// radius is relative to a unit chord.
///
/// # Example
///
/// ```rust
/// use config::constants::MERGE_RADIUS;
///
/// fn nodes_should_merge(a: [f64; 2], b: [f64; 2]) -> bool {
///     let dx = a[0] - b[0];
///     let dy = a[1] - b[1];
///     (dx * dx + dy * dy).sqrt() <= MERGE_RADIUS
/// }
///
/// assert!(nodes_should_merge([1.0, 0.0], [1.0, 1e-8]));
/// ```
pub const MERGE_RADIUS: f64 = 1e-6;

// =============================================================================
// CONTOUR CONSTANTS
// =============================================================================

/// Spline degree used for the airfoil contour.
pub const CONTOUR_SPLINE_DEGREE: usize = 3;

/// Default number of uniformly spaced spline samples before refinement.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_SPLINE_POINTS;
///
/// let requested: Option<usize> = None;
/// assert_eq!(requested.unwrap_or(DEFAULT_SPLINE_POINTS), 200);
/// ```
pub const DEFAULT_SPLINE_POINTS: usize = 200;

/// Default refinement tolerance in degrees.
///
/// A sample point whose included angle between its two neighbours is below
/// this value is refined. 180 degrees is a straight line.
pub const DEFAULT_REFINE_TOLERANCE_DEG: f64 = 172.0;

/// Maximum number of adaptive refinement passes.
///
/// Refinement stops as soon as a pass inserts no points. Hitting this cap
/// means the tolerance cannot be met (for example a corner in the input).
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_REFINE_PASSES;
///
/// let passes = 12;
/// assert!(passes < MAX_REFINE_PASSES);
/// ```
pub const MAX_REFINE_PASSES: usize = 50;

// =============================================================================
// TRAILING EDGE CONSTANTS
// =============================================================================

/// Default trailing-edge thickness as a fraction of chord (0.4 %).
pub const DEFAULT_TE_THICKNESS: f64 = 0.004;

/// Default chord fraction over which the thickness is blended in.
pub const DEFAULT_TE_BLEND: f64 = 0.3;

/// Default exponent of the thickness blending polynomial.
pub const DEFAULT_TE_EXPONENT: f64 = 3.0;

/// Number of sample segments replaced at each end by trailing-edge refinement.
pub const DEFAULT_TE_OLD_SEGMENTS: usize = 3;

/// Number of segments inserted at each end by trailing-edge refinement.
pub const DEFAULT_TE_NEW_SEGMENTS: usize = 8;

/// Largest to smallest segment ratio of the trailing-edge refinement.
pub const DEFAULT_TE_REFINE_RATIO: f64 = 3.0;

// =============================================================================
// BLOCK CONSTANTS
// =============================================================================

/// Default airfoil boundary-layer block thickness (fraction of chord).
pub const AIRFOIL_BLOCK_THICKNESS: f64 = 0.04;

/// Default number of cell layers in the airfoil block.
pub const AIRFOIL_BLOCK_DIVISIONS: usize = 15;

/// Default last/first cell ratio across the airfoil block.
pub const AIRFOIL_BLOCK_RATIO: f64 = 3.0;

/// Default number of cells across a blunt trailing-edge gap.
pub const TE_BLOCK_GAP_DIVISIONS: usize = 3;

/// Default downstream length of the trailing-edge block.
pub const TE_BLOCK_LENGTH: f64 = 0.1;

/// Default number of cell layers in the trailing-edge block.
pub const TE_BLOCK_DIVISIONS: usize = 8;

/// Default last/first cell ratio of the trailing-edge block.
pub const TE_BLOCK_RATIO: f64 = 2.5;

/// Default half height of the wind tunnel (radius of the C-boundary).
pub const TUNNEL_HEIGHT: f64 = 3.5;

/// Default number of cell layers between the inner line and the tunnel wall.
pub const TUNNEL_DIVISIONS: usize = 40;

/// Default last/first cell ratio across the tunnel block.
pub const TUNNEL_RATIO: f64 = 10.0;

/// Default exponent of the normal-offset blending weight in the tunnel block.
pub const TUNNEL_BLEND_EXPONENT: f64 = 2.0;

/// Default wake length behind the trailing-edge block.
pub const WAKE_LENGTH: f64 = 7.0;

/// Default number of streamwise cell layers in the wake block.
pub const WAKE_DIVISIONS: usize = 30;

/// Default last/first cell ratio of the wake block.
pub const WAKE_RATIO: f64 = 8.0;

/// Default relaxation of the wake outflow spacing toward uniform.
pub const WAKE_SPREAD: f64 = 0.4;

/// Default arc-length fraction of the wake inflow line where the wake
/// divisor starts.
pub const WAKE_DIVISOR_FRACTION: f64 = 0.5;

// =============================================================================
// SMOOTHING CONSTANTS
// =============================================================================

/// Default convergence tolerance of the smoothers (max node displacement).
pub const SMOOTHING_TOLERANCE: f64 = 1e-6;

/// Default iteration cap of the smoothers.
///
/// # Example
///
/// ```rust
/// use config::constants::SMOOTHING_MAX_ITERATIONS;
///
/// let iterations = 40;
/// assert!(iterations <= SMOOTHING_MAX_ITERATIONS);
/// ```
pub const SMOOTHING_MAX_ITERATIONS: usize = 200;

/// Largest angle-based smoothing step as a fraction of the shortest adjacent edge.
pub const ANGLE_STEP_FRACTION: f64 = 0.25;

// =============================================================================
// EXPORT CONSTANTS
// =============================================================================

/// Depth of the thin extruded layer written by the FLMA writer.
pub const FLMA_LAYER_DEPTH: f64 = 0.1;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Computes the per-cell geometric growth factor of a graded distribution.
///
/// `ratio` is the size of the last cell divided by the size of the first
/// one. With `divisions` cells there are `divisions - 1` growth steps, so
/// the factor is `ratio^(1/(divisions-1))`. A single cell has no growth.
///
/// # Arguments
///
/// * `ratio` - Last cell size over first cell size
/// * `divisions` - Number of cells
///
/// # Returns
///
/// The size ratio between two consecutive cells.
///
/// # Example
///
/// ```rust
/// use config::constants::growth_factor;
///
/// // Three cells growing to four times the first size: 1, 2, 4
/// assert!((growth_factor(4.0, 3) - 2.0).abs() < 1e-12);
///
/// // One cell never grows
/// assert_eq!(growth_factor(10.0, 1), 1.0);
/// ```
pub fn growth_factor(ratio: f64, divisions: usize) -> f64 {
    if divisions <= 1 {
        return 1.0;
    }
    ratio.powf(1.0 / (divisions - 1) as f64)
}

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
