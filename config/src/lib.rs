//! # Config Crate
//!
//! Centralized configuration constants for the airfoil meshing pipeline.
//! All magic numbers and tunable defaults are defined here so the contour
//! and mesh crates agree on tolerances and block layout.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, MERGE_RADIUS, AIRFOIL_BLOCK_DIVISIONS};
//!
//! // Use EPSILON for floating-point comparisons
//! let gap: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(gap.abs() < EPSILON);
//!
//! // Merge radius is much coarser than EPSILON
//! assert!(MERGE_RADIUS > EPSILON);
//!
//! // Block defaults
//! let layers = AIRFOIL_BLOCK_DIVISIONS + 1;
//! assert_eq!(layers, 16);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Chord Normalized**: Lengths are fractions of a unit chord
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
