//! # Contour Refinement
//!
//! Curvature-adaptive insertion of spline samples and geometric clustering
//! at the trailing edge. Both operations return new samples; the input is
//! never modified.

use super::{BSpline, SplineSample};
use crate::error::{ContourError, ContourResult};
use crate::geometry::{angle_between, spacing};
use config::constants::{
    DEFAULT_REFINE_TOLERANCE_DEG, DEFAULT_SPLINE_POINTS, DEFAULT_TE_NEW_SEGMENTS,
    DEFAULT_TE_OLD_SEGMENTS, DEFAULT_TE_REFINE_RATIO, EPSILON, MAX_REFINE_PASSES,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Parameters of the contour refinement step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineParams {
    /// Uniform samples taken before refinement
    pub points: usize,
    /// Included angle in degrees below which a point is refined
    pub tolerance_deg: f64,
    /// Pass limit of adaptive refinement
    pub max_passes: usize,
    /// Optional trailing-edge clustering applied after refinement
    pub refine_trailing_edge: Option<TrailingEdgeRefine>,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            points: DEFAULT_SPLINE_POINTS,
            tolerance_deg: DEFAULT_REFINE_TOLERANCE_DEG,
            max_passes: MAX_REFINE_PASSES,
            refine_trailing_edge: None,
        }
    }
}

/// Parameters of the trailing-edge clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailingEdgeRefine {
    /// Segments replaced at each end
    pub old_segments: usize,
    /// Segments inserted at each end
    pub new_segments: usize,
    /// Largest over smallest inserted segment
    pub ratio: f64,
}

impl Default for TrailingEdgeRefine {
    fn default() -> Self {
        Self {
            old_segments: DEFAULT_TE_OLD_SEGMENTS,
            new_segments: DEFAULT_TE_NEW_SEGMENTS,
            ratio: DEFAULT_TE_REFINE_RATIO,
        }
    }
}

/// Refines a sample until every interior angle meets the tolerance.
///
/// A pass walks the interior points; where the included angle between the
/// two neighbouring segments is below `tolerance_deg`, the parameter
/// midpoints of both adjacent segments are evaluated on `spline` and
/// inserted. A segment receives at most one midpoint per pass. Passes
/// repeat until one inserts nothing, then all derivatives are re-evaluated.
///
/// # Errors
///
/// `RefinementNonconvergence` when `max_passes` passes still insert points,
/// `InvalidParameter` for a tolerance outside `(0, 180)`.
pub fn adaptive_refine(
    spline: &BSpline,
    sample: &SplineSample,
    params: &RefineParams,
) -> ContourResult<SplineSample> {
    if !(params.tolerance_deg > 0.0 && params.tolerance_deg < 180.0) {
        return Err(ContourError::invalid(
            "tolerance_deg",
            format!("must lie in (0, 180), got {}", params.tolerance_deg),
        ));
    }

    let mut parameters = sample.parameters().to_vec();
    let mut positions = sample.positions().to_vec();

    for pass in 1..=params.max_passes {
        let n = positions.len();
        if n < 3 {
            return Ok(spline.sample(&parameters));
        }

        let mut next_t = Vec::with_capacity(2 * n);
        let mut next_p = Vec::with_capacity(2 * n);
        let mut inserted = 0;
        // Whether segment (i-1, i) already received its midpoint this pass
        let mut segment_done = false;

        next_t.push(parameters[0]);
        next_p.push(positions[0]);

        for i in 1..n - 1 {
            let angle = angle_between(positions[i - 1] - positions[i], positions[i + 1] - positions[i])
                .unwrap_or(180.0);

            if angle < params.tolerance_deg {
                if !segment_done {
                    let t = 0.5 * (parameters[i - 1] + parameters[i]);
                    next_t.push(t);
                    next_p.push(spline.evaluate(t).position);
                    inserted += 1;
                }
                next_t.push(parameters[i]);
                next_p.push(positions[i]);

                let t = 0.5 * (parameters[i] + parameters[i + 1]);
                next_t.push(t);
                next_p.push(spline.evaluate(t).position);
                inserted += 1;
                segment_done = true;
            } else {
                next_t.push(parameters[i]);
                next_p.push(positions[i]);
                segment_done = false;
            }
        }

        next_t.push(parameters[n - 1]);
        next_p.push(positions[n - 1]);

        parameters = next_t;
        positions = next_p;
        debug!(pass, inserted, points = positions.len(), "refinement pass");

        if inserted == 0 {
            return Ok(spline.sample(&parameters));
        }
    }

    warn!(
        passes = params.max_passes,
        points = positions.len(),
        "refinement did not converge"
    );
    Err(ContourError::RefinementNonconvergence {
        passes: params.max_passes,
        points: positions.len(),
    })
}

/// Clusters samples geometrically toward both trailing-edge ends.
///
/// The `old_segments` segments nearest `t = 0` are replaced by
/// `new_segments` segments whose parameter lengths form a geometric
/// progression (`ratio` = largest / smallest, finest at the trailing edge).
/// The same spacing is mirrored onto the `t = 1` end as `1 - t`.
///
/// # Errors
///
/// `InvalidParameter` when the sample is too short for the requested
/// segments, the two ends would overlap or a count is zero.
pub fn refine_trailing_edge(
    spline: &BSpline,
    sample: &SplineSample,
    refine: &TrailingEdgeRefine,
) -> ContourResult<SplineSample> {
    if refine.old_segments == 0 || refine.new_segments == 0 {
        return Err(ContourError::invalid("segments", "segment counts must be positive"));
    }
    let n = sample.len();
    if n <= 2 * refine.old_segments + 1 {
        return Err(ContourError::invalid(
            "old_segments",
            format!("{} segments per end do not fit in {n} samples", refine.old_segments),
        ));
    }

    let parameters = sample.parameters();
    let t_start = parameters[0];
    let t_end = parameters[n - 1];
    let span = parameters[refine.old_segments] - t_start;
    if t_start + span >= t_end - span {
        return Err(ContourError::invalid(
            "old_segments",
            "trailing-edge regions of both ends overlap",
        ));
    }

    let offsets = spacing(span, refine.new_segments, refine.ratio)?;
    let mut refined: Vec<f64> = Vec::with_capacity(n + 2 * refine.new_segments);

    refined.extend(offsets.iter().map(|d| t_start + d));
    refined.extend(
        parameters
            .iter()
            .copied()
            .filter(|&t| t > t_start + span + EPSILON && t < t_end - span - EPSILON),
    );
    refined.extend(offsets.iter().rev().map(|d| t_end - d));

    debug!(
        before = n,
        after = refined.len(),
        span,
        "trailing edge refined"
    );
    Ok(spline.sample(&refined))
}
