//! # Trailing-Edge Thickness
//!
//! Opens a sharp trailing edge (or thickens a blunt one) by pushing the
//! rear part of the contour away from the chord line.
//!
//! The displacement grows with a power of the position inside the blend
//! region, `0.5 * thickness * s^exponent` with
//! `s = (x - (x_te - blend)) / blend`, so the front of the region is
//! untouched and the trailing-edge points move by the full amount.

use super::{curvature::leading_edge, SplineSample};
use crate::error::{ContourError, ContourResult};
use config::constants::{DEFAULT_TE_BLEND, DEFAULT_TE_EXPONENT, DEFAULT_TE_THICKNESS};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which surfaces receive the thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThicknessSide {
    /// Half the thickness on each surface
    #[default]
    Both,
    /// The whole thickness on the upper surface
    Upper,
    /// The whole thickness on the lower surface
    Lower,
}

/// Trailing-edge thickness parameters. Lengths are fractions of chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailingEdgeThickness {
    /// Final trailing-edge thickness
    pub thickness: f64,
    /// Chord fraction over which the thickness is blended in
    pub blend: f64,
    /// Exponent of the blending polynomial
    pub exponent: f64,
    /// Surfaces that are displaced
    pub side: ThicknessSide,
}

impl Default for TrailingEdgeThickness {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_TE_THICKNESS,
            blend: DEFAULT_TE_BLEND,
            exponent: DEFAULT_TE_EXPONENT,
            side: ThicknessSide::Both,
        }
    }
}

/// Applies trailing-edge thickness to a refined contour sample.
///
/// The sample is split at the leading edge (minimum radius of curvature)
/// into an upper arc and a lower arc. Points behind `x_te - blend` move
/// away from the chord line, upward on the upper arc and downward on the
/// lower arc. The arcs are joined again without repeating the
/// leading-edge point, so the result has the sample's length. The caller
/// re-fits a spline if needed.
///
/// # Errors
///
/// `InvalidParameter` for a negative thickness, a blend outside `(0, 1]`,
/// a non-positive exponent or a sample with fewer than three points.
pub fn apply_thickness(
    sample: &SplineSample,
    params: &TrailingEdgeThickness,
) -> ContourResult<Vec<DVec2>> {
    if !(params.thickness >= 0.0 && params.thickness.is_finite()) {
        return Err(ContourError::invalid("thickness", "must be finite and non-negative"));
    }
    if !(params.blend > 0.0 && params.blend <= 1.0) {
        return Err(ContourError::invalid(
            "blend",
            format!("must lie in (0, 1], got {}", params.blend),
        ));
    }
    if !(params.exponent > 0.0 && params.exponent.is_finite()) {
        return Err(ContourError::invalid("exponent", "must be positive"));
    }
    if sample.len() < 3 {
        return Err(ContourError::invalid("sample", "need at least 3 points"));
    }

    let points = sample.positions();
    let le = leading_edge(sample).map_or(0, |edge| edge.index);
    let x_te = points[0].x.max(points[points.len() - 1].x);
    let x_start = x_te - params.blend;

    let (upper_share, lower_share) = match params.side {
        ThicknessSide::Both => (0.5, 0.5),
        ThicknessSide::Upper => (1.0, 0.0),
        ThicknessSide::Lower => (0.0, 1.0),
    };

    let displace = |p: DVec2, share: f64, direction: f64| -> DVec2 {
        if share == 0.0 || p.x <= x_start {
            return p;
        }
        let s = ((p.x - x_start) / params.blend).clamp(0.0, 1.0);
        p + DVec2::Y * (direction * share * params.thickness * s.powf(params.exponent))
    };

    let upper = points[..=le].iter().map(|&p| displace(p, upper_share, 1.0));
    let lower = points[le..]
        .iter()
        .skip(1)
        .map(|&p| displace(p, lower_share, -1.0));
    let result: Vec<DVec2> = upper.chain(lower).collect();

    debug!(
        leading_edge = le,
        thickness = params.thickness,
        blend = params.blend,
        "trailing edge thickness applied"
    );
    Ok(result)
}
