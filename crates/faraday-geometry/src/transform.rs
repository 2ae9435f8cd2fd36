//! Affine transformations for geometry manipulation.
//!
//! Provides scale, rotate, and translate operations applied to 3D points.
//! Drivers use these to pose conductors in a scene — for example, building
//! the six inward-facing half-spaces of a prism rotated about the z axis.

use nalgebra::{Matrix3, Rotation3, Vector3};

/// An affine transformation: rotation/scale matrix + translation.
#[derive(Debug, Clone)]
pub struct Transform {
    /// 3x3 rotation/scale matrix.
    pub matrix: Matrix3<f64>,
    /// Translation vector (m).
    pub translation: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }
}

impl Transform {
    /// Create a pure translation.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix3::identity(),
            translation: Vector3::new(dx, dy, dz),
        }
    }

    /// Create a uniform scale about the origin.
    pub fn uniform_scale(factor: f64) -> Self {
        Self {
            matrix: Matrix3::identity() * factor,
            translation: Vector3::zeros(),
        }
    }

    /// Create a non-uniform scale.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix3::from_diagonal(&Vector3::new(sx, sy, sz)),
            translation: Vector3::zeros(),
        }
    }

    /// Create a rotation about the x axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vector3::x_axis(), angle).into_inner(),
            translation: Vector3::zeros(),
        }
    }

    /// Create a rotation about the y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vector3::y_axis(), angle).into_inner(),
            translation: Vector3::zeros(),
        }
    }

    /// Create a rotation about the z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vector3::z_axis(), angle).into_inner(),
            translation: Vector3::zeros(),
        }
    }

    /// Apply this transformation to a 3D point.
    pub fn apply(&self, point: &[f64; 3]) -> [f64; 3] {
        let v = Vector3::new(point[0], point[1], point[2]);
        let result = self.matrix * v + self.translation;
        [result.x, result.y, result.z]
    }

    /// Compose two transforms: self followed by other.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            matrix: other.matrix * self.matrix,
            translation: other.matrix * self.translation + other.translation,
        }
    }
}
