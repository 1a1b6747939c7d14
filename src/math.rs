//! Vector and matrix helpers
//!
//! `nalgebra` supplies dot, cross, norm and subtraction. This module adds the pieces
//! the renderer needs on top: a zero-safe normalize, the camera's affine view matrix
//! and the rotation-only transform used for axial tilt. The two transforms are kept
//! apart on purpose: ray directions need the translation row, tilted surface points
//! must not see it.

use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

pub type Vec3 = Vector3<f64>;

/// Scale `v` to unit length. The zero vector is returned unchanged.
pub fn normalize(v: Vec3) -> Vec3 {
    let magnitude = v.norm();
    if magnitude == 0.0 {
        return v;
    }
    v / magnitude
}

/// Affine transform stored as three basis rows plus a translation row.
///
/// A point is treated as a row vector `[x, y, z, 1]` multiplied on the left, so the
/// result is `x * x_axis + y * y_axis + z * z_axis + origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMatrix {
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub z_axis: Vec3,
    pub origin: Vec3,
}

impl ViewMatrix {
    pub fn new(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3, origin: Vec3) -> Self {
        Self { x_axis, y_axis, z_axis, origin }
    }

    /// Full affine transform, translation included
    pub fn transform_point(&self, v: &Vec3) -> Vec3 {
        self.x_axis * v.x + self.y_axis * v.y + self.z_axis * v.z + self.origin
    }

    /// Row-major 4x4 form with homogeneous last column `(0, 0, 0, 1)`
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        let (x, y, z, o) = (self.x_axis, self.y_axis, self.z_axis, self.origin);
        Matrix4::new(
            x.x, x.y, x.z, 0.0,
            y.x, y.y, y.z, 0.0,
            z.x, z.y, z.z, 0.0,
            o.x, o.y, o.z, 1.0,
        )
    }
}

/// Rotation-only transform: `m * v`, no translation
pub fn rotate(v: &Vec3, m: &Matrix3<f64>) -> Vec3 {
    m * v
}

/// Right-handed rotation about the x axis
pub fn rotation_x(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, c, -s,
        0.0, s, c,
    )
}

pub fn rotate_x(v: &Vec3, theta: f64) -> Vec3 {
    rotate(v, &rotation_x(theta))
}

/// Apply a homogeneous row-major matrix the same way `ViewMatrix` does
pub fn transform_homogeneous(v: &Vec3, m: &Matrix4<f64>) -> Vec3 {
    let row = Vector4::new(v.x, v.y, v.z, 1.0).transpose() * m;
    Vec3::new(row[0], row[1], row[2])
}
