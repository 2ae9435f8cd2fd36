//! Time-domain field solvers.
//!
//! The FIT leapfrog solver ([`fit::FitSolver`]) consumes a finalised
//! [`StaggeredGrid`](crate::grid::StaggeredGrid) and advances E and H with
//! the explicit curl-curl scheme. All geometric, material, and boundary
//! effects are folded into constant per-component update coefficients at
//! construction, so a time step is two stencil sweeps and nothing else.

pub mod fit;

use serde::Serialize;

/// One sample of every field component at the configured probe cell.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProbeSample {
    /// Simulation time of the E fields (H lags by half a step).
    pub time: f64,
    pub ex: f64,
    pub ey: f64,
    pub ez: f64,
    pub hx: f64,
    pub hy: f64,
    pub hz: f64,
}
