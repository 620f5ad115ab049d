//! # Mesh Settings
//!
//! Parameters of a complete mesh run. Every struct deserializes with
//! missing fields taken from the defaults in `config::constants`, so a
//! driver can load a partial JSON document.
//!
//! ## Example
//!
//! ```rust
//! use airfoil_mesh::settings::MeshSettings;
//!
//! let settings: MeshSettings =
//!     serde_json::from_str(r#"{ "airfoil": { "divisions": 10 } }"#).unwrap();
//! assert_eq!(settings.airfoil.divisions, 10);
//! assert_eq!(settings.wake, Default::default());
//! ```

use crate::smooth::{NodeSelection, SmoothParams, Smoother};
use airfoil_contour::spline::refine::RefineParams;
use airfoil_contour::spline::trailing_edge::TrailingEdgeThickness;
use config::constants::{
    AIRFOIL_BLOCK_DIVISIONS, AIRFOIL_BLOCK_RATIO, AIRFOIL_BLOCK_THICKNESS, MERGE_RADIUS,
    TE_BLOCK_DIVISIONS, TE_BLOCK_GAP_DIVISIONS, TE_BLOCK_LENGTH, TE_BLOCK_RATIO,
    TUNNEL_BLEND_EXPONENT, TUNNEL_DIVISIONS, TUNNEL_HEIGHT, TUNNEL_RATIO, WAKE_DIVISIONS,
    WAKE_DIVISOR_FRACTION, WAKE_LENGTH, WAKE_RATIO, WAKE_SPREAD,
};
use serde::{Deserialize, Serialize};

/// Iteration cap of the default tunnel smoothing stage.
const DEFAULT_TUNNEL_SMOOTHING_ITERATIONS: usize = 50;

/// Boundary-layer block around the airfoil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirfoilBlockParams {
    /// Extrusion distance normal to the contour
    pub thickness: f64,
    /// Cells across the block
    pub divisions: usize,
    /// Outer over inner cell height
    pub ratio: f64,
}

impl Default for AirfoilBlockParams {
    fn default() -> Self {
        Self {
            thickness: AIRFOIL_BLOCK_THICKNESS,
            divisions: AIRFOIL_BLOCK_DIVISIONS,
            ratio: AIRFOIL_BLOCK_RATIO,
        }
    }
}

/// Block behind a blunt trailing edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailingEdgeBlockParams {
    /// Cells across the trailing-edge gap
    pub te_divisions: usize,
    /// Downstream extent
    pub length: f64,
    /// Cells downstream
    pub divisions: usize,
    /// Last over first downstream cell length
    pub ratio: f64,
}

impl Default for TrailingEdgeBlockParams {
    fn default() -> Self {
        Self {
            te_divisions: TE_BLOCK_GAP_DIVISIONS,
            length: TE_BLOCK_LENGTH,
            divisions: TE_BLOCK_DIVISIONS,
            ratio: TE_BLOCK_RATIO,
        }
    }
}

/// C-shaped far-field block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelBlockParams {
    /// Radius of the C-boundary and half-height of the tunnel
    pub height: f64,
    /// Cells from the inner line to the far field
    pub divisions: usize,
    /// Outer over inner cell height along the side boundaries
    pub ratio: f64,
    /// Exponent of the normal-offset blending weight
    pub blend_exponent: f64,
}

impl Default for TunnelBlockParams {
    fn default() -> Self {
        Self {
            height: TUNNEL_HEIGHT,
            divisions: TUNNEL_DIVISIONS,
            ratio: TUNNEL_RATIO,
            blend_exponent: TUNNEL_BLEND_EXPONENT,
        }
    }
}

/// Wake block downstream of the tunnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeBlockParams {
    /// Distance from the tunnel outflow to the wake outflow
    pub length: f64,
    /// Cells downstream
    pub divisions: usize,
    /// Last over first downstream cell length
    pub ratio: f64,
    /// Blend of the outflow spacing toward uniform, in `[0, 1]`
    pub spread: f64,
    /// Arc-length fraction of the inflow line where the straight divisor
    /// line starts, in `(0, 1)`
    pub divisor: f64,
}

impl Default for WakeBlockParams {
    fn default() -> Self {
        Self {
            length: WAKE_LENGTH,
            divisions: WAKE_DIVISIONS,
            ratio: WAKE_RATIO,
            spread: WAKE_SPREAD,
            divisor: WAKE_DIVISOR_FRACTION,
        }
    }
}

/// One smoothing pass applied to the tunnel block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingStage {
    /// Algorithm
    pub smoother: Smoother,
    /// Nodes that may move
    #[serde(default)]
    pub selection: NodeSelection,
    /// Iteration controls
    #[serde(default)]
    pub params: SmoothParams,
}

/// Everything needed to turn contour points into a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Spline sampling and refinement
    pub refine: RefineParams,
    /// Optional trailing-edge thickness, applied before meshing
    pub thickness: Option<TrailingEdgeThickness>,
    /// Airfoil block
    pub airfoil: AirfoilBlockParams,
    /// Trailing-edge block
    pub trailing_edge: TrailingEdgeBlockParams,
    /// Tunnel block
    pub tunnel: TunnelBlockParams,
    /// Wake block
    pub wake: WakeBlockParams,
    /// Smoothing stages run on the tunnel block, in order
    pub smoothing: Vec<SmoothingStage>,
    /// Distance within which block nodes are merged
    pub merge_radius: f64,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            refine: RefineParams::default(),
            thickness: None,
            airfoil: AirfoilBlockParams::default(),
            trailing_edge: TrailingEdgeBlockParams::default(),
            tunnel: TunnelBlockParams::default(),
            wake: WakeBlockParams::default(),
            smoothing: vec![SmoothingStage {
                smoother: Smoother::AngleBased,
                selection: NodeSelection::Interior,
                params: SmoothParams {
                    iterations: DEFAULT_TUNNEL_SMOOTHING_ITERATIONS,
                    ..SmoothParams::default()
                },
            }],
            merge_radius: MERGE_RADIUS,
        }
    }
}
