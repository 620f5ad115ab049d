//! Curvature of a sampled spline and leading-edge detection.

use super::SplineSample;
use config::constants::approx_zero;
use glam::DVec2;

/// Per-sample curvature quantities, derived from a `SplineSample`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurvatureField {
    /// Slope dy/dx, signed infinity where the tangent is vertical and zero
    /// where the first derivative vanishes
    pub gradient: Vec<f64>,
    /// Signed curvature, positive when turning counter-clockwise
    pub curvature: Vec<f64>,
    /// Radius of curvature, infinite on straight parts
    pub radius: Vec<f64>,
    /// Centre of the osculating circle, `None` on straight parts
    pub center: Vec<Option<DVec2>>,
}

/// The point of smallest radius of curvature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadingEdge {
    /// Sample index
    pub index: usize,
    /// Radius of curvature at that sample
    pub radius: f64,
}

/// Computes curvature at every sample.
///
/// `C = (x'y'' - y'x'') / (x'^2 + y'^2)^1.5`, `R = 1/|C|`.
pub fn curvature_field(sample: &SplineSample) -> CurvatureField {
    let n = sample.len();
    let mut field = CurvatureField {
        gradient: Vec::with_capacity(n),
        curvature: Vec::with_capacity(n),
        radius: Vec::with_capacity(n),
        center: Vec::with_capacity(n),
    };

    let points = sample
        .positions()
        .iter()
        .zip(sample.first_derivatives())
        .zip(sample.second_derivatives());

    for ((&p, &d1), &d2) in points {
        let speed_sq = d1.length_squared();
        let curvature = if speed_sq > 0.0 {
            d1.perp_dot(d2) / speed_sq.powf(1.5)
        } else {
            0.0
        };

        field.gradient.push(slope(d1));
        field.curvature.push(curvature);

        if approx_zero(curvature) {
            field.radius.push(f64::INFINITY);
            field.center.push(None);
        } else {
            field.radius.push(1.0 / curvature.abs());
            // Left normal; 1/C carries the side of the centre
            let normal = d1.perp().normalize_or_zero();
            field.center.push(Some(p + normal / curvature));
        }
    }

    field
}

fn slope(d1: DVec2) -> f64 {
    if d1.x != 0.0 {
        d1.y / d1.x
    } else if d1.y == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(d1.y)
    }
}

/// Finds the sample with the smallest radius of curvature.
///
/// The first index wins on exact ties. Returns `None` for an empty sample.
pub fn leading_edge(sample: &SplineSample) -> Option<LeadingEdge> {
    let field = curvature_field(sample);
    field
        .radius
        .iter()
        .enumerate()
        .fold(None, |best: Option<LeadingEdge>, (index, &radius)| match best {
            Some(b) if b.radius <= radius => Some(b),
            _ => Some(LeadingEdge { index, radius }),
        })
}
