//! Extrusion of a base line into graded U-lines.

use super::StructuredBlock;
use crate::error::{MeshError, MeshResult};
use airfoil_contour::geometry::{curve_normals, mean_normal, spacing, unit};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Direction in which a base line is extruded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrudeDirection {
    /// Each point moves along its own curve normal
    Normals,
    /// All points move along the normal of the line's end-to-end chord
    MeanNormal,
    /// All points move along a fixed vector (normalized)
    Vector(DVec2),
}

impl StructuredBlock {
    /// Appends `divisions` offset copies of `base`.
    ///
    /// Offsets follow `spacing(length, divisions, ratio)`, so the first new
    /// line sits one first-cell height away from `base` and the last one at
    /// `length`. An empty block first receives `base` itself.
    ///
    /// # Errors
    ///
    /// `BlockShape` when `base` does not match the block's line length,
    /// `InvalidParameter` for a degenerate direction or bad spacing input.
    pub fn extrude(
        &mut self,
        base: &[DVec2],
        direction: ExtrudeDirection,
        length: f64,
        divisions: usize,
        ratio: f64,
    ) -> MeshResult<()> {
        if !self.is_empty() && base.len() != self.line_len {
            return Err(MeshError::block_shape(
                &self.name,
                format!(
                    "base line has {} points, block lines have {}",
                    base.len(),
                    self.line_len
                ),
            ));
        }

        let directions: Vec<DVec2> = match direction {
            ExtrudeDirection::Normals => curve_normals(base, false),
            ExtrudeDirection::MeanNormal => {
                let normal = mean_normal(base).ok_or_else(|| {
                    MeshError::invalid("direction", "base line ends coincide, no mean normal")
                })?;
                vec![normal; base.len()]
            }
            ExtrudeDirection::Vector(v) => {
                let v = unit(v)
                    .ok_or_else(|| MeshError::invalid("direction", "zero extrusion vector"))?;
                vec![v; base.len()]
            }
        };

        let offsets = spacing(length, divisions, ratio)?;

        if self.is_empty() {
            self.add_line(base)?;
        }
        for offset in &offsets[1..] {
            let line: Vec<DVec2> = base
                .iter()
                .zip(&directions)
                .map(|(p, n)| *p + *n * *offset)
                .collect();
            self.add_line(&line)?;
        }
        Ok(())
    }
}
