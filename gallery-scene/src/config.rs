//! Viewer configuration, loadable from a JSON file.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Camera setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Where the camera starts before easing to its first target.
    pub start_position: Vec3,
    /// Convergence rate of the camera easing, per second.
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 70.0,
            near: 0.1,
            far: 1000.0,
            start_position: Vec3::new(0.0, 0.0, 100.0),
            damping: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Image sources, assigned to frame slots in order.
    pub images: Vec<String>,
    pub title: String,
    pub window_size: [u32; 2],
    /// Location to open at, e.g. `/` or `/item/<id>`.
    pub initial_route: String,
    pub camera: CameraConfig,
    /// Default tracing filter directive; `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            title: "Gallery".to_string(),
            window_size: [1280, 720],
            initial_route: "/".to_string(),
            camera: CameraConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl GalleryConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov must be in (0, 180) degrees, got {}",
                camera.fov_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(ConfigError::Invalid(format!(
                "clip range must satisfy 0 < near < far, got {}..{}",
                camera.near, camera.far
            )));
        }
        if !(camera.damping > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "damping must be positive, got {}",
                camera.damping
            )));
        }
        if self.window_size[0] == 0 || self.window_size[1] == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }
        Ok(())
    }
}
