//! # Parametric Contour
//!
//! Interpolating B-splines through airfoil points and the sampled
//! representation used by refinement and meshing.
//!
//! ## Pipeline
//!
//! ```text
//! raw points → fit_spline → SplineSample
//!            → refine::adaptive_refine (curvature driven)
//!            → refine::refine_trailing_edge (optional)
//!            → trailing_edge::apply_thickness (optional)
//! ```
//!
//! The spline is not smoothed: it passes through every input point.

mod basis;
pub mod curvature;
pub mod refine;
mod sample;
pub mod trailing_edge;
#[cfg(test)]
mod tests;

pub use curvature::{curvature_field, leading_edge, CurvatureField, LeadingEdge};
pub use sample::SplineSample;

use crate::error::{ContourError, ContourResult};
use crate::geometry::{first_crossing, first_reversal};
use basis::{basis_derivatives, find_span};
use config::constants::EPSILON;
use glam::DVec2;
use nalgebra::DMatrix;
use tracing::debug;

/// Position and derivatives of a spline at one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplinePoint {
    /// Position C(t)
    pub position: DVec2,
    /// First derivative C'(t)
    pub first: DVec2,
    /// Second derivative C''(t)
    pub second: DVec2,
}

/// Interpolating B-spline over the parameter domain `[0, 1]`.
#[derive(Debug, Clone)]
pub struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    coefficients: Vec<DVec2>,
    parameters: Vec<f64>,
}

impl BSpline {
    /// Fits a spline passing exactly through `points`.
    ///
    /// Data parameters are normalized centripetal lengths (cumulative square
    /// roots of the chord lengths) and the knot vector is built by averaging
    /// them, which keeps the collocation matrix non-singular for distinct
    /// points. Centripetal parameters keep the curvature of the interpolant
    /// free of spurious peaks next to a sparsely sampled nose.
    ///
    /// # Errors
    ///
    /// `SplineFit` for fewer than `degree + 1` points, non-finite input,
    /// duplicate consecutive points, a polyline that crosses itself or
    /// doubles back, or a singular system.
    pub fn interpolate(points: &[DVec2], degree: usize) -> ContourResult<Self> {
        if degree == 0 {
            return Err(ContourError::spline_fit("degree must be at least 1"));
        }
        if points.len() < degree + 1 {
            return Err(ContourError::spline_fit(format!(
                "degree {degree} needs at least {} points, got {}",
                degree + 1,
                points.len()
            )));
        }
        if let Some(bad) = points.iter().position(|p| !p.is_finite()) {
            return Err(ContourError::spline_fit(format!("point {bad} is not finite")));
        }
        if let Some(dup) = points.windows(2).position(|w| w[0].distance(w[1]) < EPSILON) {
            return Err(ContourError::spline_fit(format!(
                "points {dup} and {} coincide",
                dup + 1
            )));
        }

        if let Some((a, b)) = first_crossing(points) {
            return Err(ContourError::spline_fit(format!(
                "segments {a} and {b} of the input polyline intersect"
            )));
        }
        if let Some(k) = first_reversal(points) {
            return Err(ContourError::spline_fit(format!(
                "polyline doubles back on itself at point {k}"
            )));
        }

        let parameters = centripetal_parameters(points);
        let knots = averaged_knots(&parameters, degree);
        let m = points.len();

        let mut matrix = DMatrix::<f64>::zeros(m, m);
        for (row, &u) in parameters.iter().enumerate() {
            let span = find_span(m - 1, degree, u, &knots);
            let ders = basis_derivatives(span, u, degree, 0, &knots);
            for (j, value) in ders[0].iter().enumerate() {
                matrix[(row, span - degree + j)] = *value;
            }
        }

        let mut rhs = DMatrix::<f64>::zeros(m, 2);
        for (row, p) in points.iter().enumerate() {
            rhs[(row, 0)] = p.x;
            rhs[(row, 1)] = p.y;
        }

        let solution = matrix
            .lu()
            .solve(&rhs)
            .ok_or_else(|| ContourError::spline_fit("collocation system is singular"))?;
        let coefficients = (0..m)
            .map(|i| DVec2::new(solution[(i, 0)], solution[(i, 1)]))
            .collect();

        Ok(Self {
            degree,
            knots,
            coefficients,
            parameters,
        })
    }

    /// Spline degree.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Clamped knot vector.
    #[inline]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Control coefficients.
    #[inline]
    pub fn coefficients(&self) -> &[DVec2] {
        &self.coefficients
    }

    /// Parameters at which the input points are interpolated.
    #[inline]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Evaluates position, first and second derivative at `t`.
    ///
    /// `t` is clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f64) -> SplinePoint {
        let u = t.clamp(0.0, 1.0);
        let n = self.coefficients.len() - 1;
        let span = find_span(n, self.degree, u, &self.knots);
        let ders = basis_derivatives(span, u, self.degree, 2, &self.knots);

        let mut out = [DVec2::ZERO; 3];
        for (k, row) in ders.iter().enumerate() {
            for (j, weight) in row.iter().enumerate() {
                out[k] += self.coefficients[span - self.degree + j] * *weight;
            }
        }

        SplinePoint {
            position: out[0],
            first: out[1],
            second: out[2],
        }
    }

    /// Evaluates the spline at every parameter.
    pub fn sample(&self, parameters: &[f64]) -> SplineSample {
        SplineSample::from_points(
            parameters
                .iter()
                .map(|&t| (t.clamp(0.0, 1.0), self.evaluate(t))),
        )
    }
}

/// Fits a spline and samples it.
///
/// With `evaluate_at_knots` the sample sits exactly on the data parameters
/// (reproducing the input points); otherwise `num_samples` parameters are
/// spaced uniformly over `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use airfoil_contour::spline::fit_spline;
/// use glam::DVec2;
///
/// let points = [DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0), DVec2::new(-1.0, 0.0), DVec2::new(0.0, -1.0)];
/// let (spline, sample) = fit_spline(&points, 3, 50, false).unwrap();
/// assert_eq!(spline.degree(), 3);
/// assert_eq!(sample.len(), 50);
/// ```
pub fn fit_spline(
    points: &[DVec2],
    degree: usize,
    num_samples: usize,
    evaluate_at_knots: bool,
) -> ContourResult<(BSpline, SplineSample)> {
    let spline = BSpline::interpolate(points, degree)?;

    let parameters: Vec<f64> = if evaluate_at_knots {
        spline.parameters().to_vec()
    } else {
        if num_samples < 2 {
            return Err(ContourError::invalid(
                "num_samples",
                format!("need at least 2 samples, got {num_samples}"),
            ));
        }
        (0..num_samples)
            .map(|k| k as f64 / (num_samples - 1) as f64)
            .collect()
    };

    let sample = spline.sample(&parameters);
    debug!(
        points = points.len(),
        degree,
        samples = sample.len(),
        "spline fitted"
    );
    Ok((spline, sample))
}

/// Normalized cumulative centripetal parameters, `sqrt(|P_k - P_k-1|)` per step.
fn centripetal_parameters(points: &[DVec2]) -> Vec<f64> {
    let mut params = Vec::with_capacity(points.len());
    let mut total = 0.0;
    params.push(0.0);
    for w in points.windows(2) {
        total += w[0].distance(w[1]).sqrt();
        params.push(total);
    }
    for p in params.iter_mut() {
        *p /= total;
    }
    if let Some(last) = params.last_mut() {
        *last = 1.0;
    }
    params
}

/// Clamped knot vector whose interior knots average `degree` consecutive
/// data parameters.
fn averaged_knots(parameters: &[f64], degree: usize) -> Vec<f64> {
    let m = parameters.len();
    let mut knots = vec![0.0; m + degree + 1];
    for j in 1..m - degree {
        let sum: f64 = parameters[j..j + degree].iter().sum();
        knots[j + degree] = sum / degree as f64;
    }
    for knot in knots.iter_mut().skip(m) {
        *knot = 1.0;
    }
    knots
}
