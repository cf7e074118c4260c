//! Application configuration with TOML support.
//!
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `[spawn]` is valid:
//!
//! ```toml
//! [spawn]
//! count = [200, 600]
//! duration_secs = 2.5
//! seed = 42
//! ```

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::ConfigError;
use crate::time::{FrameClock, MAX_TIME_SCALE};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "fireworks.toml";

/// Longest accepted ramp, in seconds.
pub const MAX_DURATION_SECS: f32 = 3600.0;

/// Longest accepted frame delta clamp, in milliseconds.
pub const MAX_FRAME_DELTA_MS: u64 = 60_000;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct FireworksConfig {
    /// Window options.
    pub window: WindowConfig,
    /// Camera options.
    pub camera: CameraConfig,
    /// Random spawn ranges.
    pub spawn: SpawnConfig,
    /// Sprite palette.
    pub textures: TextureConfig,
    /// Firework launched on startup, if any.
    pub initial: Option<InitialFirework>,
    /// Frame clock options.
    pub clock: ClockConfig,
}

/// Window options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial logical width.
    pub width: u32,
    /// Initial logical height.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "fireburst".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Camera options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Initial camera position, looking at the origin.
    pub position: [f32; 3],
    /// Orbit damping factor per frame (0 disables inertia).
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 25.0,
            near: 0.1,
            far: 100.0,
            position: [1.5, 0.0, 6.0],
            damping: 0.05,
        }
    }
}

impl CameraConfig {
    /// Camera at `position` looking at the origin.
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::looking_at(Vec3::from_array(self.position), Vec3::ZERO);
        camera.fov_y_degrees = self.fov_degrees;
        camera.near = self.near;
        camera.far = self.far;
        camera.damping = self.damping;
        camera
    }
}

/// Ranges the spawn controller draws from. Ranges are `[min, max)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    /// Particle count range.
    pub count: [i32; 2],
    /// Lower corner of the origin box.
    pub origin_min: [f32; 3],
    /// Upper corner of the origin box.
    pub origin_max: [f32; 3],
    /// Base sprite size range.
    pub size: [f32; 2],
    /// Shell radius range.
    pub radius: [f32; 2],
    /// HSL saturation of the random color.
    pub saturation: f32,
    /// HSL lightness of the random color.
    pub lightness: f32,
    /// Length of the progress ramp in seconds.
    pub duration_secs: f32,
    /// Fixed RNG seed for reproducible shows.
    pub seed: Option<u64>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            count: [400, 1400],
            origin_min: [-1.0, 0.0, -1.0],
            origin_max: [1.0, 1.0, 1.0],
            size: [0.1, 0.2],
            radius: [0.0, 0.5],
            saturation: 1.0,
            lightness: 0.7,
            duration_secs: 3.0,
            seed: None,
        }
    }
}

impl SpawnConfig {
    /// Particle count range.
    pub fn count_range(&self) -> Range<i32> {
        self.count[0]..self.count[1]
    }

    /// Base size range.
    pub fn size_range(&self) -> Range<f32> {
        self.size[0]..self.size[1]
    }

    /// Radius range.
    pub fn radius_range(&self) -> Range<f32> {
        self.radius[0]..self.radius[1]
    }

    /// Lower corner of the origin box.
    pub fn origin_min(&self) -> Vec3 {
        Vec3::from_array(self.origin_min)
    }

    /// Upper corner of the origin box.
    pub fn origin_max(&self) -> Vec3 {
        Vec3::from_array(self.origin_max)
    }

    /// Ramp duration.
    ///
    /// Out-of-range values are clamped to `[0, MAX_DURATION_SECS]`.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.duration_secs.clamp(0.0, MAX_DURATION_SECS))
            .unwrap_or(Duration::ZERO)
    }

    /// Reject ranges the controller cannot sample from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count[0] <= 0 || self.count[0] >= self.count[1] {
            return Err(ConfigError::Invalid {
                field: "spawn.count",
                reason: format!("need 0 < min < max, got {:?}", self.count),
            });
        }
        if !(self.size[0] > 0.0 && self.size[0] < self.size[1]) {
            return Err(ConfigError::Invalid {
                field: "spawn.size",
                reason: format!("need 0 < min < max, got {:?}", self.size),
            });
        }
        if !(self.radius[0] >= 0.0 && self.radius[0] < self.radius[1]) {
            return Err(ConfigError::Invalid {
                field: "spawn.radius",
                reason: format!("need 0 <= min < max, got {:?}", self.radius),
            });
        }
        for axis in 0..3 {
            if !(self.origin_min[axis] < self.origin_max[axis]) {
                return Err(ConfigError::Invalid {
                    field: "spawn.origin_min",
                    reason: format!(
                        "must be below origin_max on every axis, got {:?} vs {:?}",
                        self.origin_min, self.origin_max
                    ),
                });
            }
        }
        if !(self.duration_secs >= 0.0 && self.duration_secs <= MAX_DURATION_SECS) {
            return Err(ConfigError::Invalid {
                field: "spawn.duration_secs",
                reason: format!("need 0 <= secs <= {MAX_DURATION_SECS}, got {}", self.duration_secs),
            });
        }
        Ok(())
    }
}

/// Sprite palette options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Directory holding `1.png` … `{count}.png`.
    pub directory: PathBuf,
    /// Number of sprites.
    pub count: usize,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("particles"),
            count: crate::textures::DEFAULT_PALETTE_SIZE,
        }
    }
}

/// A fixed firework, launched once on startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InitialFirework {
    /// Particle count.
    pub count: i32,
    /// World-space origin.
    pub position: [f32; 3],
    /// Base sprite size.
    pub size: f32,
    /// Palette slot (0-based).
    pub texture: usize,
    /// Shell radius.
    pub radius: f32,
    /// Linear RGB color.
    pub color: [f32; 3],
}

impl Default for InitialFirework {
    fn default() -> Self {
        Self {
            count: 100,
            position: [0.0, 0.0, 0.0],
            size: 0.3,
            texture: 7,
            radius: 1.0,
            color: [0.0, 1.0, 1.0],
        }
    }
}

/// Frame clock options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    /// Longest frame delta fed to animations, in milliseconds.
    pub max_delta_ms: u64,
    /// Playback speed multiplier.
    pub time_scale: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_delta_ms: 100,
            time_scale: 1.0,
        }
    }
}

impl ClockConfig {
    /// Reject speeds and clamps the clock cannot represent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_scale >= 0.0 && self.time_scale <= MAX_TIME_SCALE) {
            return Err(ConfigError::Invalid {
                field: "clock.time_scale",
                reason: format!("need 0 <= scale <= {MAX_TIME_SCALE}, got {}", self.time_scale),
            });
        }
        if self.max_delta_ms > MAX_FRAME_DELTA_MS {
            return Err(ConfigError::Invalid {
                field: "clock.max_delta_ms",
                reason: format!("need at most {MAX_FRAME_DELTA_MS}, got {}", self.max_delta_ms),
            });
        }
        Ok(())
    }

    /// A clock starting now with these limits.
    pub fn clock(&self) -> FrameClock {
        let mut clock = FrameClock::new();
        clock.set_max_delta(Duration::from_millis(self.max_delta_ms));
        clock.set_time_scale(self.time_scale);
        clock
    }
}

impl FireworksConfig {
    /// Defaults plus the startup firework.
    pub fn with_initial_firework() -> Self {
        Self {
            initial: Some(InitialFirework::default()),
            ..Self::default()
        }
    }

    /// Parse a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.spawn.validate()?;
        config.clock.validate()?;
        Ok(config)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Load `explicit` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else built-in defaults with the startup firework.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::info!("Loading config from {}", path.display());
            return Self::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            log::info!("Loading config from {}", fallback.display());
            return Self::load(fallback);
        }
        log::info!("No {DEFAULT_CONFIG_FILE} found, using defaults");
        Ok(Self::with_initial_firework())
    }
}
