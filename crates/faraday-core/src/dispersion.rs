//! Frequency-dependent material response.
//!
//! **Status: Stub for future implementation.**
//!
//! The material operators default to vacuum and are zeroed inside perfect
//! conductors; dispersive media (Drude/Lorentz poles, conductive losses)
//! would enter here as auxiliary differential equations updated alongside
//! the leapfrog, turning the per-edge `1/ε` coefficient into a small
//! convolution state.
//!
//! # Physical considerations
//!
//! A dispersive update must preserve the scheme's explicit structure: the
//! auxiliary polarisation currents are local to each edge, so they fold
//! into the same per-component coefficient lattices the solver already
//! precomputes, at the cost of extra state per edge.

// This module is intentionally left as a stub.
