//! Error types for fireburst.
//!
//! Spawn-level failures ([`FireworkError`]) are local to a single firework
//! and never stop the render loop. Everything else is a startup failure and
//! ends up in [`AppError`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while creating or driving a single firework.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FireworkError {
    /// A spawn parameter was out of range (non-positive particle count,
    /// negative radius, non-positive size).
    #[error("invalid firework parameter: {0}")]
    InvalidParameter(String),
    /// GPU buffer, texture binding or material creation failed.
    #[error("failed to allocate firework resources: {0}")]
    ResourceAllocation(String),
    /// An operation was attempted in the wrong lifecycle state,
    /// e.g. animating a firework twice.
    #[error("firework is {state}, cannot {operation}")]
    InvalidState {
        /// Lifecycle state the firework was in.
        state: &'static str,
        /// Operation that was refused.
        operation: &'static str,
    },
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a GPU with Vulkan/Metal/DX12/WebGPU support is required")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
    /// Built-in WGSL failed validation.
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// WGSL validation failure.
#[derive(Debug, Error, Clone)]
#[error("{stage} shader error: {message}")]
pub struct ShaderError {
    /// Human readable diagnostic.
    pub message: String,
    /// Which shader failed.
    pub stage: &'static str,
}

/// Errors that can occur during texture loading.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Failed to decode image file.
    #[error("failed to load image '{path}': {source}")]
    ImageLoad {
        /// File that failed to load.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse TOML.
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        /// Config path.
        path: PathBuf,
        /// TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// A value parsed but is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted field name, e.g. `spawn.count`.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors that can occur when running the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A sprite could not be loaded.
    #[error(transparent)]
    Texture(#[from] TextureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message() {
        let err = FireworkError::InvalidState {
            state: "animating",
            operation: "animate",
        };
        assert_eq!(err.to_string(), "firework is animating, cannot animate");
    }

    #[test]
    fn test_config_error_wraps_into_app_error() {
        let err: AppError = ConfigError::Invalid {
            field: "spawn.count",
            reason: "empty range".into(),
        }
        .into();
        assert!(err.to_string().contains("spawn.count"));
    }
}
