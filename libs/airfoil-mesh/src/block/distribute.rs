//! Redistribution of nodes along one block line.

use super::StructuredBlock;
use crate::error::{MeshError, MeshResult};
use airfoil_contour::geometry::{arc_length_parameters, resample_polyline};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Which family of lines an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDirection {
    /// U-line `j`
    U,
    /// V-line `i`
    V,
}

/// Target node distribution along a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// Equal arc-length fractions
    Uniform,
    /// Fractions blended between the first and last line of the family,
    /// weighted by the line's position in the family
    Transitional,
}

impl StructuredBlock {
    /// Moves the nodes of one line along its own polyline.
    ///
    /// The line keeps its shape and end points; only the parameter
    /// fractions of its interior nodes change.
    ///
    /// # Errors
    ///
    /// `BlockShape` if `index` is not a line of the block.
    pub fn redistribute(
        &mut self,
        direction: LineDirection,
        index: usize,
        mode: Distribution,
    ) -> MeshResult<()> {
        let count = match direction {
            LineDirection::U => self.line_count(),
            LineDirection::V => self.line_len,
        };
        if index >= count {
            return Err(MeshError::block_shape(
                &self.name,
                format!("no {direction:?}-line {index} (block has {count})"),
            ));
        }

        let line = self.line(direction, index);
        let n = line.len();
        if n < 3 {
            return Ok(());
        }

        let fractions: Vec<f64> = match mode {
            Distribution::Uniform => (0..n).map(|k| k as f64 / (n - 1) as f64).collect(),
            Distribution::Transitional => {
                let first = arc_length_parameters(&self.line(direction, 0));
                let last = arc_length_parameters(&self.line(direction, count - 1));
                let w = if count > 1 {
                    index as f64 / (count - 1) as f64
                } else {
                    0.0
                };
                first
                    .iter()
                    .zip(&last)
                    .map(|(a, b)| (1.0 - w) * a + w * b)
                    .collect()
            }
        };

        let moved = resample_polyline(&line, &fractions);
        for (k, p) in moved.into_iter().enumerate() {
            match direction {
                LineDirection::U => self.set_node(k, index, p),
                LineDirection::V => self.set_node(index, k, p),
            }
        }
        Ok(())
    }

    fn line(&self, direction: LineDirection, index: usize) -> Vec<DVec2> {
        match direction {
            LineDirection::U => self.u_line(index).to_vec(),
            LineDirection::V => self.v_line(index),
        }
    }
}
