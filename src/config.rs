use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::animation::Smoothing;
use crate::error::ConfigError;
use crate::scene::{SceneSettings, View};

pub const ENV_FPS: &str = "FARMVIEW_FPS";
pub const ENV_VIEW: &str = "FARMVIEW_VIEW";

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 120;

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub default_view: View,
    #[serde(default)]
    pub hide_hud: bool,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnimationConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub smoothing: Smoothing,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CameraConfig {
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_damping")]
    pub damping: f32,
}

pub fn default_fps() -> u32 {
    30
}

pub fn default_fov() -> f32 {
    75.0
}

pub fn default_camera_position() -> [f32; 3] {
    [50.0, 30.0, 50.0]
}

pub fn default_damping() -> f32 {
    0.05
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            smoothing: Smoothing::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            position: default_camera_position(),
            damping: default_damping(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            log::warn!(
                "config file not found at {:?}, using defaults",
                config_path
            );
            let mut config = Self::default();
            config.apply_env_overrides()?;
            return Ok(config);
        }

        let mut config = Self::load_from_path(&config_path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(ENV_FPS) {
            let fps = val
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: ENV_FPS,
                    value: val.clone(),
                })?;
            self.animation.fps = fps;
        }

        if let Ok(val) = env::var(ENV_VIEW) {
            let view = val
                .parse::<View>()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: ENV_VIEW,
                    value: val.clone(),
                })?;
            self.default_view = view;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FPS..=MAX_FPS).contains(&self.animation.fps) {
            return Err(ConfigError::InvalidFps(self.animation.fps));
        }

        let fov = self.camera.fov_degrees;
        if fov.is_nan() || fov <= 0.0 || fov >= 180.0 {
            return Err(ConfigError::InvalidFov(fov));
        }

        let damping = self.camera.damping;
        if damping.is_nan() || !(0.0..1.0).contains(&damping) {
            return Err(ConfigError::InvalidDamping(damping));
        }

        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(ConfigError::ParseError)
    }

    pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config)
        } else {
            dirs::config_dir()
                .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
                .ok_or(ConfigError::NoConfigDir)?
        };

        Ok(config_dir.join("farmview"))
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn scene_settings(&self) -> SceneSettings {
        SceneSettings {
            fov_degrees: self.camera.fov_degrees,
            camera_position: self.camera.position.into(),
            damping: self.camera.damping,
            smoothing: self.animation.smoothing,
        }
    }
}
