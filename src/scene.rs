//! The planet, its lighting and the sun

use crate::math::{rotate, rotation_x, Vec3};
use nalgebra::Matrix3;

/// Sun position. Far enough away to act as a directional light.
pub const SUN_POSITION: Vec3 = Vec3::new(0.0, 999_999.0, 0.0);

/// How the surface is lit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Illumination {
    /// Directional sun, day side blends into night side
    Sun,
    /// Same luminance everywhere; `Uniform(1.0)` shows only the day texture
    Uniform(f64),
}

impl Illumination {
    pub fn from_lighting(enabled: bool) -> Self {
        if enabled {
            Illumination::Sun
        } else {
            Illumination::Uniform(1.0)
        }
    }
}

/// Sphere centred on the world origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planet {
    pub radius: f64,
    pub tilt_degrees: f64,
    pub illumination: Illumination,
    tilt: Matrix3<f64>,
}

impl Default for Planet {
    fn default() -> Self {
        Self::new(1.0, crate::DEFAULT_TILT_DEGREES, Illumination::Sun)
    }
}

impl Planet {
    pub fn new(radius: f64, tilt_degrees: f64, illumination: Illumination) -> Self {
        Self {
            radius,
            tilt_degrees,
            illumination,
            tilt: rotation_x(-tilt_degrees.to_radians()),
        }
    }

    /// Undo the axial tilt of a surface point so texture latitude follows the poles
    pub fn untilt(&self, point: &Vec3) -> Vec3 {
        rotate(point, &self.tilt)
    }

    /// Luminance at `point` with outward `normal`, in `[0, 1]`
    pub fn luminance(&self, point: &Vec3, normal: &Vec3) -> f64 {
        match self.illumination {
            Illumination::Sun => {
                let light = crate::math::normalize(SUN_POSITION - point);
                sun_luminance(normal, &light)
            }
            Illumination::Uniform(value) => value,
        }
    }
}

/// Steep ramp around the terminator so the day/night edge stays narrow
pub fn sun_luminance(normal: &Vec3, light: &Vec3) -> f64 {
    (5.0 * normal.dot(light) + 0.5).clamp(0.0, 1.0)
}
