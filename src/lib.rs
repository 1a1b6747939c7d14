//! ASCII planet renderer
//!
//! Casts one ray per character cell at a unit sphere, shades it with a single distant
//! sun and samples a pair of day/night ASCII textures blended by illumination.
//! Stepping the rotation angle between frames spins the planet.

pub mod animation;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod export;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod terminal;
pub mod texgen;
pub mod texture;

pub use animation::{Revolution, Spin};
pub use camera::Camera;
pub use canvas::{Canvas, Viewport};
pub use renderer::Renderer;
pub use scene::{Illumination, Planet};
pub use texture::{Palette, Texture, TexturePair};

/// Brightness ramp from darkest to brightest
pub const DEFAULT_PALETTE: &str = " .:;',wiogOLXHWYV@";

/// Character left in cells whose ray misses the planet
pub const BACKGROUND: char = ' ';

/// Axial tilt in degrees
pub const DEFAULT_TILT_DEGREES: f64 = 23.5;

/// Frames in one revolution at speed 1.0
pub const FRAMES_PER_REVOLUTION: u32 = 18;

/// Scale above which the planet no longer fits the default view
pub const MAX_ADVISORY_SCALE: f64 = 1.5;
