mod loader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::camera::Camera;
use crate::canvas::Viewport;
use crate::scene::{Illumination, Planet};
use crate::texture::{Palette, TextureError, TexturePair};

pub use loader::load_config;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub textures: TexturesConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Day/night texture files and the palette they are drawn from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TexturesConfig {
    #[serde(default = "default_day")]
    pub day: PathBuf,
    #[serde(default = "default_night")]
    pub night: PathBuf,
    /// Characters from darkest to brightest
    #[serde(default = "default_palette")]
    pub palette: String,
}

fn default_day() -> PathBuf {
    PathBuf::from("textures/earth.txt")
}

fn default_night() -> PathBuf {
    PathBuf::from("textures/earth_night.txt")
}

fn default_palette() -> String {
    crate::DEFAULT_PALETTE.to_string()
}

impl Default for TexturesConfig {
    fn default() -> Self {
        Self {
            day: default_day(),
            night: default_night(),
            palette: default_palette(),
        }
    }
}

/// Planet appearance and spin
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Sphere radius multiplier
    #[serde(default = "default_one")]
    pub scale: f64,
    /// Allow `scale` above the advisory ceiling
    #[serde(default)]
    pub force_scale: bool,
    /// Fraction of the default per-frame rotation step
    #[serde(default = "default_one")]
    pub speed: f64,
    /// Axial tilt in degrees
    #[serde(default = "default_tilt")]
    pub tilt: f64,
    #[serde(default = "default_true")]
    pub lighting: bool,
    #[serde(default = "default_background")]
    pub background: char,
}

fn default_one() -> f64 {
    1.0
}

fn default_tilt() -> f64 {
    crate::DEFAULT_TILT_DEGREES
}

fn default_true() -> bool {
    true
}

fn default_background() -> char {
    crate::BACKGROUND
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: default_one(),
            force_scale: false,
            speed: default_one(),
            tilt: default_tilt(),
            lighting: default_true(),
            background: default_background(),
        }
    }
}

/// Camera placement in spherical coordinates (angles in radians)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CameraConfig {
    #[serde(default = "default_distance")]
    pub distance: f64,
    #[serde(default)]
    pub azimuth: f64,
    #[serde(default)]
    pub polar: f64,
}

fn default_distance() -> f64 {
    2.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: default_distance(),
            azimuth: 0.0,
            polar: 0.0,
        }
    }
}

/// Streaming display settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
}

fn default_frame_interval() -> u64 {
    100
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
        }
    }
}

/// Batch export settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_output() -> PathBuf {
    PathBuf::from("earth_frames.json")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load `config_path` if given, else `config.yaml` if present, else defaults
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new("config.yaml");
                if path.exists() {
                    return Self::from_file(path);
                }
                Ok(Self::default())
            }
        }
    }

    /// Reject settings the renderer cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;

        if !render.scale.is_finite() || render.scale <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "scale must be a positive number, got {}",
                render.scale
            )));
        }
        if render.scale > crate::MAX_ADVISORY_SCALE && !render.force_scale {
            return Err(ConfigError::ScaleTooLarge {
                scale: render.scale,
                max: crate::MAX_ADVISORY_SCALE,
            });
        }
        if !render.speed.is_finite() || render.speed <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "speed must be a positive number, got {}",
                render.speed
            )));
        }
        if !render.tilt.is_finite() {
            return Err(ConfigError::Validation("tilt must be finite".to_string()));
        }

        if self.textures.palette.is_empty() {
            return Err(ConfigError::Validation("palette is empty".to_string()));
        }

        let viewport = &self.viewport;
        if viewport.cell_width == 0 || viewport.cell_height == 0 {
            return Err(ConfigError::Validation(
                "cell width and height must be non-zero".to_string(),
            ));
        }
        if viewport.columns() == 0 || viewport.rows() == 0 {
            return Err(ConfigError::Validation(format!(
                "viewport {}x{} px holds no {}x{} cells",
                viewport.width_px, viewport.height_px, viewport.cell_width, viewport.cell_height
            )));
        }

        let camera = &self.camera;
        if ![camera.distance, camera.azimuth, camera.polar]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ConfigError::Validation(
                "camera coordinates must be finite".to_string(),
            ));
        }
        if camera.distance <= render.scale {
            return Err(ConfigError::Validation(format!(
                "camera distance {} is inside the planet (radius {})",
                camera.distance, render.scale
            )));
        }

        Ok(())
    }

    pub fn planet(&self) -> Planet {
        Planet::new(
            self.render.scale,
            self.render.tilt,
            Illumination::from_lighting(self.render.lighting),
        )
    }

    pub fn build_camera(&self) -> Camera {
        Camera::new(self.camera.distance, self.camera.azimuth, self.camera.polar)
    }

    pub fn palette(&self) -> Result<Palette, TextureError> {
        Palette::new(&self.textures.palette)
    }

    /// Load and validate both textures against the configured palette
    pub fn load_textures(&self) -> Result<TexturePair, TextureError> {
        TexturePair::load(&self.textures.day, &self.textures.night, self.palette()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Scale {scale} exceeds the advisory maximum of {max}; pass --force-scale to use it anyway")]
    ScaleTooLarge { scale: f64, max: f64 },

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
