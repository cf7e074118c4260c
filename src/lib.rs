//! # fireburst
//!
//! GPU particle fireworks. Click the window and a burst of textured,
//! additively blended sparks opens, falls, twinkles and fades out.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fireburst::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     env_logger::init();
//!     let config = FireworksConfig::discover(None)?;
//!     fireburst::run(config)
//! }
//! ```
//!
//! ## How a firework works
//!
//! 1. [`SpawnController`] draws random [`FireworkSpawnParams`].
//! 2. [`sample_shell`] fills a [`ParticleBuffer`] with points on a
//!    spherical shell, each with a size factor and a time multiplier.
//! 3. [`FireworkInstance::create`] uploads the particles through a
//!    [`ResourceAllocator`] and attaches the firework to the [`Scene`].
//! 4. [`Fireworks`] schedules a 0→1 progress ramp on its [`TweenDriver`].
//!    Every frame the ramp ticks, the new progress is written to the
//!    material uniform and the vertex shader animates the sparks.
//! 5. When the ramp completes the firework is detached and its buffers
//!    released.
//!
//! ## Headless use
//!
//! Nothing above step 3 needs a GPU. [`HeadlessAllocator`] implements
//! [`ResourceAllocator`] with plain bookkeeping, so the whole lifecycle can
//! be driven from tests:
//!
//! ```ignore
//! let mut ctx = RenderContext::default();
//! let mut alloc = HeadlessAllocator::new();
//! let mut fireworks = Fireworks::new();
//! let mut rng = SmallRng::seed_from_u64(7);
//!
//! let id = fireworks.launch(&mut ctx, &mut alloc, &params, DEFAULT_DURATION, &mut rng)?;
//! fireworks.update(&mut ctx, &mut alloc, Duration::from_secs(4));
//! assert!(ctx.scene.is_empty());
//! ```
//!
//! ## Configuration
//!
//! See [`config`] for the `fireworks.toml` format.

pub mod allocator;
pub mod camera;
pub mod config;
pub mod error;
pub mod firework;
pub mod fireworks;
pub mod gpu;
pub mod input;
pub mod motion;
pub mod render_context;
pub mod sampler;
pub mod scene;
pub mod shader;
pub mod spawn;
pub mod textures;
pub mod time;
pub mod tween;
mod window;

pub use allocator::{HeadlessAllocator, HeadlessResources, ResourceAllocator};
pub use camera::Camera;
pub use config::FireworksConfig;
pub use error::{AppError, ConfigError, FireworkError, GpuError, ShaderError, TextureError};
pub use firework::{FireworkInstance, FireworkMaterial, FireworkSpawnParams, FireworkState};
pub use fireworks::{Fireworks, DEFAULT_DURATION};
pub use glam::{Vec2, Vec3};
pub use render_context::{RenderContext, Viewport};
pub use sampler::{sample_shell, ParticleBuffer};
pub use scene::{DrawableId, Scene};
pub use spawn::SpawnController;
pub use textures::{TextureHandle, TexturePalette};
pub use time::FrameClock;
pub use tween::{RampEvent, RampId, TweenDriver};
pub use window::{run, App};

/// Common imports.
pub mod prelude {
    pub use crate::allocator::{HeadlessAllocator, ResourceAllocator};
    pub use crate::camera::Camera;
    pub use crate::config::FireworksConfig;
    pub use crate::error::{AppError, FireworkError};
    pub use crate::firework::{FireworkInstance, FireworkSpawnParams, FireworkState};
    pub use crate::fireworks::{Fireworks, DEFAULT_DURATION};
    pub use crate::render_context::{RenderContext, Viewport};
    pub use crate::scene::{DrawableId, Scene};
    pub use crate::spawn::SpawnController;
    pub use crate::textures::{TextureHandle, TexturePalette};
    pub use crate::tween::{RampEvent, TweenDriver};
    pub use crate::{Vec2, Vec3};
}
