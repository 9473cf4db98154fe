//! Error types

/// Rejected configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("hourglass {name} must be positive and finite, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// GPU setup and frame errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("surface has no supported {0}")]
    Unsupported(&'static str),
}

pub type RenderResult<T> = Result<T, RenderError>;
