//! Plain-text contour reader.
//!
//! Whitespace separated columns, one point per line. Blank lines and lines
//! starting with the comment marker are skipped; any other line must start
//! with two floats.

use crate::error::{ContourError, ContourResult};
use glam::DVec2;
use std::path::Path;
use tracing::debug;

/// Reads a contour file into raw (un-normalized) points.
///
/// # Errors
///
/// `Io` if the file cannot be read, `FileFormat` for the first line that
/// does not parse.
pub fn read_contour(path: &Path, comment: &str) -> ContourResult<Vec<DVec2>> {
    let text = std::fs::read_to_string(path).map_err(|e| ContourError::io(path, e))?;
    let points = parse_contour(&text, comment)?;
    debug!(path = %path.display(), points = points.len(), "contour loaded");
    Ok(points)
}

/// Parses contour text into raw points.
///
/// # Example
///
/// ```rust
/// use airfoil_contour::contour::parse_contour;
///
/// let text = "# NACA 0012\n1.0 0.0\n0.5 0.06\n\n0.0 0.0\n";
/// let points = parse_contour(text, "#").unwrap();
/// assert_eq!(points.len(), 3);
/// ```
pub fn parse_contour(text: &str, comment: &str) -> ContourResult<Vec<DVec2>> {
    let mut points = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || (!comment.is_empty() && line.starts_with(comment)) {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let (Some(x), Some(y)) = (tokens.next(), tokens.next()) else {
            return Err(ContourError::file_format(index + 1, raw, "expected two columns"));
        };
        let x: f64 = x
            .parse()
            .map_err(|_| ContourError::file_format(index + 1, raw, format!("'{x}' is not a number")))?;
        let y: f64 = y
            .parse()
            .map_err(|_| ContourError::file_format(index + 1, raw, format!("'{y}' is not a number")))?;

        points.push(DVec2::new(x, y));
    }

    Ok(points)
}
