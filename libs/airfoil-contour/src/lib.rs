//! # Airfoil Contour
//!
//! Loading and parametric refinement of airfoil outlines.
//!
//! ## Architecture
//!
//! ```text
//! contour file → contour (normalized points) → spline (fit, refine, thicken)
//!                                                  ↓
//!                                   refined contour for airfoil-mesh
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use airfoil_contour::spline::fit_spline;
//! use airfoil_contour::spline::refine::{adaptive_refine, RefineParams};
//! use glam::DVec2;
//!
//! // Ellipse, counter-clockwise from the trailing edge
//! let points: Vec<DVec2> = (0..40)
//!     .map(|k| {
//!         let a = std::f64::consts::TAU * k as f64 / 39.0;
//!         DVec2::new(0.5 + 0.5 * a.cos(), 0.1 * a.sin())
//!     })
//!     .collect();
//!
//! let (spline, sample) = fit_spline(&points, 3, 100, false).unwrap();
//! let refined = adaptive_refine(&spline, &sample, &RefineParams::default()).unwrap();
//! assert!(refined.len() > sample.len());
//! ```

pub mod contour;
pub mod error;
pub mod geometry;
pub mod spline;

pub use contour::Contour;
pub use error::{ContourError, ContourResult};
pub use spline::{fit_spline, BSpline, SplinePoint, SplineSample};
