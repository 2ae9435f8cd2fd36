//! # Faraday Geometry
//!
//! Conductor geometry for the Faraday framework. This crate provides:
//!
//! - **Solid primitives** ([`primitives`]) — Spheres, cuboids, and
//!   half-spaces defined by simple parameters, each answering a
//!   point-membership query.
//! - **Assemblies** ([`assembly`]) — The [`assembly::Conductor`] trait
//!   consumed by the grid, and [`assembly::ConductorAssembly`], the union of
//!   a set of solids.
//! - **Transformations** ([`transform`]) — Scale, rotate, and translate
//!   operations used to pose conductors in a scene.

pub mod assembly;
pub mod primitives;
pub mod transform;
