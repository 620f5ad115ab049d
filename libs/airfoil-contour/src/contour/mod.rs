//! # Airfoil Contour
//!
//! An ordered, chord-normalized airfoil outline.
//!
//! Points run from the trailing edge over the upper surface to the leading
//! edge and back along the lower surface (Selig order), which makes the
//! outline counter-clockwise. Outlines given clockwise are reversed on
//! construction.

mod reader;

pub use reader::{parse_contour, read_contour};

use crate::error::{ContourError, ContourResult};
use crate::geometry::signed_area;
use config::constants::{approx_zero, EPSILON};
use glam::DVec2;
use tracing::debug;

/// A normalized airfoil contour.
///
/// Invariants: x spans `[0, 1]`, there are no duplicate consecutive points
/// and the outline is counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<DVec2>,
    chord: f64,
}

impl Contour {
    /// Builds a contour from raw points, normalizing it to unit chord.
    ///
    /// x is shifted so its minimum is 0 and both axes are divided by the
    /// chord length (the x extent).
    ///
    /// # Errors
    ///
    /// Fails with `InvalidParameter` for non-finite coordinates, fewer than
    /// three distinct points or a zero chord.
    pub fn normalized(raw: &[DVec2]) -> ContourResult<Self> {
        if let Some(bad) = raw.iter().position(|p| !p.is_finite()) {
            return Err(ContourError::invalid(
                "points",
                format!("point {bad} is not finite"),
            ));
        }

        let mut points: Vec<DVec2> = Vec::with_capacity(raw.len());
        for &p in raw {
            if points.last().map_or(true, |last| last.distance(p) > EPSILON) {
                points.push(p);
            }
        }
        if points.len() < 3 {
            return Err(ContourError::invalid(
                "points",
                format!("need at least 3 distinct points, got {}", points.len()),
            ));
        }

        let x_min = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let x_max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let chord = x_max - x_min;
        if chord < EPSILON {
            return Err(ContourError::invalid("points", "contour has zero chord"));
        }

        for p in points.iter_mut() {
            *p = DVec2::new((p.x - x_min) / chord, p.y / chord);
        }

        if signed_area(&points) < 0.0 {
            debug!(points = points.len(), "reversing clockwise contour");
            points.reverse();
        }

        Ok(Self { points, chord })
    }

    /// Returns the normalized points.
    #[inline]
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the contour has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Chord length of the raw input, before normalization.
    #[inline]
    pub fn chord(&self) -> f64 {
        self.chord
    }

    /// Distance between the first and last point (0 for a sharp trailing edge).
    pub fn trailing_edge_gap(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first.distance(*last),
            _ => 0.0,
        }
    }

    /// Returns true if the outline closes on itself at the trailing edge.
    pub fn is_closed(&self) -> bool {
        approx_zero(self.trailing_edge_gap())
    }

    /// Index of the point with the smallest x (the geometric nose).
    pub fn nose_index(&self) -> usize {
        self.points
            .iter()
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, p)| {
                if p.x < best.1 {
                    (i, p.x)
                } else {
                    best
                }
            })
            .0
    }
}
