//! Field state: the E, H, and J lattices owned by the solver.
//!
//! Each Cartesian component is an `nx × ny × nz` scalar lattice on its
//! staggered location: E components on primal edges, H components on the
//! faces they pierce, J collocated with E. Allocated once at solver
//! construction, mutated in place every step, never resized.

use ndarray::Array3;

/// The nine per-component field lattices of a simulation.
#[derive(Debug, Clone)]
pub struct FieldState {
    nx: usize,
    ny: usize,
    nz: usize,
    pub(crate) ex: Array3<f64>,
    pub(crate) ey: Array3<f64>,
    pub(crate) ez: Array3<f64>,
    pub(crate) hx: Array3<f64>,
    pub(crate) hy: Array3<f64>,
    pub(crate) hz: Array3<f64>,
    pub(crate) jx: Array3<f64>,
    pub(crate) jy: Array3<f64>,
    pub(crate) jz: Array3<f64>,
}

macro_rules! component_accessors {
    ($get:ident, $set:ident, $field:ident) => {
        #[doc = concat!("Read `", stringify!($field), "` at `(i, j, k)`.")]
        #[inline]
        pub fn $get(&self, i: usize, j: usize, k: usize) -> f64 {
            self.$field[[i, j, k]]
        }

        #[doc = concat!("Write `", stringify!($field), "` at `(i, j, k)`.")]
        #[inline]
        pub fn $set(&mut self, i: usize, j: usize, k: usize, value: f64) {
            self.$field[[i, j, k]] = value;
        }
    };
}

impl FieldState {
    /// Allocate zeroed fields for an `nx × ny × nz` grid.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        let zeros = || Array3::zeros((nx, ny, nz));
        Self {
            nx,
            ny,
            nz,
            ex: zeros(),
            ey: zeros(),
            ez: zeros(),
            hx: zeros(),
            hy: zeros(),
            hz: zeros(),
            jx: zeros(),
            jy: zeros(),
            jz: zeros(),
        }
    }

    /// Grid dimensions `(nx, ny, nz)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    component_accessors!(ex, set_ex, ex);
    component_accessors!(ey, set_ey, ey);
    component_accessors!(ez, set_ez, ez);
    component_accessors!(hx, set_hx, hx);
    component_accessors!(hy, set_hy, hy);
    component_accessors!(hz, set_hz, hz);
    component_accessors!(jx, set_jx, jx);
    component_accessors!(jy, set_jy, jy);
    component_accessors!(jz, set_jz, jz);

    /// Whether every stored value is finite.
    ///
    /// Numerical blow-up is surfaced through this check rather than being
    /// detected inside the update loop: the integrator is explicit and
    /// non-adaptive, so a NaN or Inf is the caller's signal to stop.
    pub fn is_finite(&self) -> bool {
        self.arrays().iter().all(|a| a.iter().all(|v| v.is_finite()))
    }

    /// Largest absolute value across all components.
    pub fn max_abs(&self) -> f64 {
        self.arrays()
            .iter()
            .flat_map(|a| a.iter())
            .fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    fn arrays(&self) -> [&Array3<f64>; 9] {
        [
            &self.ex, &self.ey, &self.ez, &self.hx, &self.hy, &self.hz, &self.jx, &self.jy,
            &self.jz,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let f = FieldState::new(4, 3, 2);
        assert_eq!(f.dims(), (4, 3, 2));
        assert_eq!(f.max_abs(), 0.0);
        assert!(f.is_finite());
    }

    #[test]
    fn test_set_and_get() {
        let mut f = FieldState::new(4, 4, 4);
        f.set_hz(1, 2, 3, -2.5);
        f.set_jx(0, 0, 0, 1.0);
        assert_eq!(f.hz(1, 2, 3), -2.5);
        assert_eq!(f.jx(0, 0, 0), 1.0);
        assert_eq!(f.max_abs(), 2.5);
    }

    #[test]
    fn test_nan_is_detected() {
        let mut f = FieldState::new(2, 2, 2);
        assert!(f.is_finite());
        f.set_ey(1, 1, 1, f64::NAN);
        assert!(!f.is_finite());
    }
}
