//! Orbiting camera built from spherical coordinates

use crate::canvas::Viewport;
use crate::math::{Vec3, ViewMatrix};

/// Camera looking at the world origin from a point on a sphere of radius `r`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub matrix: ViewMatrix,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(2.0, 0.0, 0.0)
    }
}

impl Camera {
    /// Place the camera at distance `r`, azimuth `alpha` and polar angle `beta`.
    pub fn new(r: f64, alpha: f64, beta: f64) -> Self {
        let (sin_a, cos_a) = alpha.sin_cos();
        let (sin_b, cos_b) = beta.sin_cos();

        let position = Vec3::new(r * cos_a * cos_b, r * sin_a * cos_b, r * sin_b);

        let matrix = ViewMatrix::new(
            Vec3::new(-sin_a, cos_a, 0.0),
            Vec3::new(cos_a * sin_b, sin_a * sin_b, -cos_b),
            Vec3::new(cos_a * cos_b, sin_a * cos_b, sin_b),
            position,
        );

        Self { position, matrix }
    }

    /// Turn a camera-local direction into a world-space direction (not normalized)
    pub fn world_direction(&self, local: &Vec3) -> Vec3 {
        self.matrix.transform_point(local) - self.position
    }

    /// Project a world point onto the cell grid.
    ///
    /// Returns `None` for points that are not in front of the camera. The result may
    /// lie outside the grid; callers clip.
    pub fn convert(&self, point: &Vec3, viewport: &Viewport) -> Option<(i64, i64)> {
        let v = self.matrix.transform_point(point);
        if v.z >= 0.0 {
            return None;
        }

        let x = -v.x / v.z * viewport.half_columns() + viewport.half_columns();
        let y = -v.y / v.z * viewport.vertical_scale() + viewport.half_rows();

        Some((x as i64, y as i64))
    }
}
