//! Core types shared across the Faraday framework.
//!
//! This module defines the physical constants, the immutable configuration
//! structs handed to grid and solver construction, and the configuration
//! error taxonomy. There is no module-level mutable state: every knob is a
//! value passed in at construction time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speed of light in vacuum (m/s).
pub const C_LIGHT: f64 = 299_792_458.0;

/// Vacuum permittivity (F/m).
pub const EPS_0: f64 = 8.854_187_812_8e-12;

/// Vacuum permeability (H/m).
pub const MU_0: f64 = 1.256_637_062_12e-6;

/// The rectilinear domain box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridBounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl GridBounds {
    /// A cube of side `l` centred on the origin.
    pub fn centred_cube(l: f64) -> Self {
        let h = l / 2.0;
        Self {
            xmin: -h,
            xmax: h,
            ymin: -h,
            ymax: h,
            zmin: -h,
            zmax: h,
        }
    }

    /// Extent along each axis.
    pub fn extents(&self) -> [f64; 3] {
        [
            self.xmax - self.xmin,
            self.ymax - self.ymin,
            self.zmax - self.zmin,
        ]
    }
}

/// Which geometry pipeline the grid runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridScheme {
    /// Cut-cell conformal correction plus ECT stabilisation.
    Conformal,
    /// Staircase approximation: every edge/face is kept whole or dropped
    /// whole, decided by a single midpoint membership test.
    Staircase,
}

/// Policy parameters for the ECT stabilisation pass.
///
/// The reference behaviour does not pin these down, so they are exposed as
/// configuration and validated through the conservation and exclusion
/// properties instead of a fixed numeric choice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StabilisationPolicy {
    /// Fraction of the nominal face area a cut face must reach to keep the
    /// local Courant condition no tighter than the un-cut grid.
    pub area_threshold: f64,
    /// How far (in cells, per in-plane axis) a borrower may look for
    /// lenders before giving up and being excluded.
    pub search_radius: usize,
}

impl Default for StabilisationPolicy {
    fn default() -> Self {
        Self {
            area_threshold: 0.5,
            search_radius: 2,
        }
    }
}

/// Boundary condition applied to one side of the domain along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    /// Wrap-around: the high side of the axis connects back to the low side.
    Periodic,
    /// Perfect electric conductor: tangential E forced to zero.
    #[serde(alias = "electric")]
    Pec,
    /// Perfect magnetic conductor: tangential H forced to zero.
    #[serde(alias = "magnetic")]
    Pmc,
    /// Perfectly matched layer. Accepted in configuration, rejected at
    /// solver construction: declared but not implemented.
    Pml,
}

/// Per-axis, per-side boundary configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Condition at the low bound of x, y, z.
    pub low: [BoundaryKind; 3],
    /// Condition at the high bound of x, y, z.
    pub high: [BoundaryKind; 3],
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            low: [BoundaryKind::Periodic; 3],
            high: [BoundaryKind::Periodic; 3],
        }
    }
}

impl BoundaryConfig {
    /// The same condition on every side.
    pub fn uniform(kind: BoundaryKind) -> Self {
        Self {
            low: [kind; 3],
            high: [kind; 3],
        }
    }
}

/// Fatal configuration errors, raised at construction and never recovered.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {nx}x{ny}x{nz}")]
    InvalidDimensions { nx: usize, ny: usize, nz: usize },

    #[error("domain extent along {axis} must be positive, got {extent}")]
    InvalidExtent { axis: char, extent: f64 },

    #[error("stabilisation threshold must lie in (0, 1), got {0}")]
    InvalidThreshold(f64),

    #[error(
        "periodic boundary on axis {axis} must be paired: low is {low:?}, high is {high:?}"
    )]
    UnpairedPeriodic {
        axis: char,
        low: BoundaryKind,
        high: BoundaryKind,
    },

    #[error("PML boundaries are declared but not implemented")]
    UnsupportedPml,

    #[error("Courant number must lie in (0, 1], got {0}")]
    InvalidCourant(f64),

    #[error("probe index ({i}, {j}, {k}) lies outside the {nx}x{ny}x{nz} grid")]
    ProbeOutOfRange {
        i: usize,
        j: usize,
        k: usize,
        nx: usize,
        ny: usize,
        nz: usize,
    },
}
