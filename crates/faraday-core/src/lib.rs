//! # Faraday Core
//!
//! The numerical backbone of the Faraday framework. This crate implements a
//! time-domain electromagnetic solver based on the Finite Integration
//! Technique (FIT) on a staggered Cartesian grid, with conformal (cut-cell)
//! conductor boundaries stabilised by the Enlarged Cell Technique (ECT).
//!
//! ## Architecture
//!
//! A simulation is assembled in dependency order: a conductor assembly
//! (from `faraday-geometry`) is classified by the [`grid::StaggeredGrid`],
//! which computes the conformally corrected lengths and areas and runs the
//! borrowing/lending stabilisation pass; the [`solver::fit::FitSolver`]
//! folds the finished geometry, the material constants, and the boundary
//! conditions into two constant update operators and advances the
//! [`fields::FieldState`] with an explicit leapfrog.
//!
//! ## Modules
//!
//! - [`types`] — Constants, configuration structs, error taxonomy.
//! - [`grid`] — Staggered mesh, classification, conformal correction, ECT.
//! - [`fields`] — The E/H/J field lattices.
//! - [`solver`] — The FIT leapfrog solver.
//! - [`cavity`] — Analytic resonant-cavity modes for validation.
//! - [`dispersion`] — Dispersive materials (stub).

pub mod cavity;
pub mod dispersion;
pub mod fields;
pub mod grid;
pub mod solver;
pub mod types;
