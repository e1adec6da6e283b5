use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to write config file {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine a config directory")]
    NoConfigDir,

    #[error("Invalid value for environment variable {name}: {value:?}")]
    InvalidEnvVar { name: &'static str, value: String },

    #[error("Invalid frame rate {0}: must be between 1 and 120")]
    InvalidFps(u32),

    #[error("Invalid camera field of view {0}: must be between 0 and 180 degrees")]
    InvalidFov(f32),

    #[error("Invalid camera damping {0}: must be in [0, 1)")]
    InvalidDamping(f32),
}

impl ConfigError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::ReadError { .. } => "ReadError",
            ConfigError::ParseError(_) => "ParseError",
            ConfigError::SerializeError(_) => "SerializeError",
            ConfigError::WriteError { .. } => "WriteError",
            ConfigError::NoConfigDir => "NoConfigDir",
            ConfigError::InvalidEnvVar { .. } => "InvalidEnvVar",
            ConfigError::InvalidFps(_) => "InvalidFps",
            ConfigError::InvalidFov(_) => "InvalidFov",
            ConfigError::InvalidDamping(_) => "InvalidDamping",
        }
    }
}

/// Construction-time rejections from the object factories.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("{entity} speed must be positive, got {speed}")]
    NonPositiveSpeed { entity: &'static str, speed: f32 },

    #[error("equipment route must contain at least one waypoint")]
    EmptyRoute,

    #[error("{entity} placement must be finite, got ({x}, {y}, {z})")]
    NonFinitePlacement {
        entity: &'static str,
        x: f32,
        y: f32,
        z: f32,
    },
}

impl SceneError {
    pub fn kind(&self) -> &'static str {
        match self {
            SceneError::NonPositiveSpeed { .. } => "NonPositiveSpeed",
            SceneError::EmptyRoute => "EmptyRoute",
            SceneError::NonFinitePlacement { .. } => "NonFinitePlacement",
        }
    }
}
