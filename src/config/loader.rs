use std::path::Path;

use super::{AppConfig, ConfigError};

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;

    tracing::debug!(path = %path.display(), "Loaded configuration");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_missing_config() {
        let result = load_config("/nonexistent/config.yaml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let file = write_config("invalid: yaml: content: [");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_valid() {
        let file = write_config(
            r#"
textures:
  day: "maps/day.txt"
  night: "maps/night.txt"
  palette: " .:oO@"

render:
  scale: 1.2
  speed: 0.5
  tilt: 26.0
  lighting: false
  background: "~"

viewport:
  width_px: 400
  height_px: 320

camera:
  distance: 3.0
  azimuth: 0.5
  polar: 0.1

display:
  frame_interval_ms: 50

export:
  output: "spin.json"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.textures.day.to_str(), Some("maps/day.txt"));
        assert_eq!(config.textures.palette, " .:oO@");
        assert_eq!(config.render.scale, 1.2);
        assert_eq!(config.render.speed, 0.5);
        assert_eq!(config.render.tilt, 26.0);
        assert!(!config.render.lighting);
        assert_eq!(config.render.background, '~');
        assert_eq!(config.viewport.columns(), 100);
        assert_eq!(config.viewport.rows(), 40);
        assert_eq!(config.viewport.cell_width, 4);
        assert_eq!(config.camera.distance, 3.0);
        assert_eq!(config.display.frame_interval_ms, 50);
        assert_eq!(config.export.output.to_str(), Some("spin.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_minimal() {
        let file = write_config("render:\n  tilt: 0.0\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.render.tilt, 0.0);
        assert_eq!(config.render.scale, 1.0);
        assert_eq!(config.textures.palette, crate::DEFAULT_PALETTE);
        assert_eq!(config.display.frame_interval_ms, 100);
    }

    #[test]
    fn test_config_from_file() {
        let result = AppConfig::from_file("/nonexistent/path.yaml");
        assert!(result.is_err());
    }
}
