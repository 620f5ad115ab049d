//! Sampled spline: positions, parameters and derivatives kept in lock-step.

use super::SplinePoint;
use glam::DVec2;

/// Points evaluated on a spline together with their parameters and
/// derivatives.
///
/// The four arrays always have the same length; they are only changed
/// through the lock-step mutators below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplineSample {
    positions: Vec<DVec2>,
    parameters: Vec<f64>,
    first: Vec<DVec2>,
    second: Vec<DVec2>,
}

impl SplineSample {
    /// Creates an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sample from `(parameter, evaluation)` pairs.
    pub fn from_points(points: impl IntoIterator<Item = (f64, SplinePoint)>) -> Self {
        let mut sample = Self::new();
        for (t, point) in points {
            sample.push(t, point);
        }
        sample
    }

    /// Number of sampled points.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the sample is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sampled positions.
    #[inline]
    pub fn positions(&self) -> &[DVec2] {
        &self.positions
    }

    /// Spline parameters of the samples.
    #[inline]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// First derivatives.
    #[inline]
    pub fn first_derivatives(&self) -> &[DVec2] {
        &self.first
    }

    /// Second derivatives.
    #[inline]
    pub fn second_derivatives(&self) -> &[DVec2] {
        &self.second
    }

    /// Returns the evaluation at `index`.
    pub fn point(&self, index: usize) -> Option<SplinePoint> {
        Some(SplinePoint {
            position: *self.positions.get(index)?,
            first: self.first[index],
            second: self.second[index],
        })
    }

    /// Appends one sample.
    pub fn push(&mut self, t: f64, point: SplinePoint) {
        self.parameters.push(t);
        self.positions.push(point.position);
        self.first.push(point.first);
        self.second.push(point.second);
    }

    /// Inserts one sample before `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, t: f64, point: SplinePoint) {
        self.parameters.insert(index, t);
        self.positions.insert(index, point.position);
        self.first.insert(index, point.first);
        self.second.insert(index, point.second);
    }

    /// Removes and returns the sample at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> (f64, SplinePoint) {
        let t = self.parameters.remove(index);
        let point = SplinePoint {
            position: self.positions.remove(index),
            first: self.first.remove(index),
            second: self.second.remove(index),
        };
        (t, point)
    }
}
