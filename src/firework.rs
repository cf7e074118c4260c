//! A single firework: particle buffers, material and lifecycle.
//!
//! # Lifecycle
//!
//! ```text
//! create ──► Created ──animate──► Animating ──ramp completes──► Disposed
//!               │                                                 ▲
//!               └───────────────────── dispose ───────────────────┘
//! ```
//!
//! [`FireworkInstance::create`] samples the particles, allocates GPU
//! resources and attaches the firework to the scene. [`animate`] schedules
//! the 0→1 progress ramp; the owner applies ticks with [`set_progress`] and
//! calls [`dispose`] when the ramp completes. Disposal detaches from the
//! scene and releases the GPU resources exactly once; later calls are
//! no-ops.
//!
//! [`animate`]: FireworkInstance::animate
//! [`set_progress`]: FireworkInstance::set_progress
//! [`dispose`]: FireworkInstance::dispose

use std::time::Duration;

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::allocator::ResourceAllocator;
use crate::error::FireworkError;
use crate::sampler::{sample_shell, ParticleBuffer};
use crate::scene::{DrawableId, Scene};
use crate::textures::TextureHandle;
use crate::tween::{RampId, TweenDriver};

/// Everything needed to build one firework.
#[derive(Debug, Clone, PartialEq)]
pub struct FireworkSpawnParams {
    /// Number of particles. Must be positive.
    pub particle_count: i32,
    /// World-space center of the burst.
    pub origin: Vec3,
    /// Base sprite size. Must be positive.
    pub base_size: f32,
    /// Sprite texture.
    pub texture: TextureHandle,
    /// Outer radius of the burst shell. Must be non-negative.
    pub sphere_radius: f32,
    /// Linear RGB color.
    pub color: Vec3,
}

impl FireworkSpawnParams {
    /// Check ranges and return the particle count as a `usize`.
    pub fn validate(&self) -> Result<usize, FireworkError> {
        if self.particle_count <= 0 {
            return Err(FireworkError::InvalidParameter(format!(
                "particle count must be positive, got {}",
                self.particle_count
            )));
        }
        if !self.sphere_radius.is_finite() || self.sphere_radius < 0.0 {
            return Err(FireworkError::InvalidParameter(format!(
                "sphere radius must be finite and non-negative, got {}",
                self.sphere_radius
            )));
        }
        if !self.base_size.is_finite() || self.base_size <= 0.0 {
            return Err(FireworkError::InvalidParameter(format!(
                "base size must be finite and positive, got {}",
                self.base_size
            )));
        }
        if !self.origin.is_finite() {
            return Err(FireworkError::InvalidParameter("origin must be finite".into()));
        }
        Ok(self.particle_count as usize)
    }
}

/// Shader parameters for one firework.
#[derive(Debug, Clone, PartialEq)]
pub struct FireworkMaterial {
    /// Base sprite size.
    pub size: f32,
    /// Render resolution in pixels.
    pub resolution: Vec2,
    /// Sprite texture.
    pub texture: TextureHandle,
    /// Linear RGB color.
    pub color: Vec3,
    /// World-space translation of the burst.
    pub origin: Vec3,
    /// Animation progress in `[0, 1]`.
    pub progress: f32,
}

/// Where a firework is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireworkState {
    /// Buffers exist and it is in the scene, progress is 0.
    Created,
    /// A progress ramp is running.
    Animating,
    /// Detached and resources released.
    Disposed,
}

impl FireworkState {
    fn as_str(self) -> &'static str {
        match self {
            FireworkState::Created => "created",
            FireworkState::Animating => "animating",
            FireworkState::Disposed => "disposed",
        }
    }
}

/// One live (or finished) firework.
///
/// `R` is the allocator's resource type; it is `Some` until disposal.
#[derive(Debug)]
pub struct FireworkInstance<R> {
    id: DrawableId,
    particles: ParticleBuffer,
    material: FireworkMaterial,
    resources: Option<R>,
    state: FireworkState,
    ramp: Option<RampId>,
}

impl<R> FireworkInstance<R> {
    /// Build a firework and attach it to `scene`.
    ///
    /// Fails with [`FireworkError::InvalidParameter`] for out-of-range params
    /// and [`FireworkError::ResourceAllocation`] if the allocator refuses. In
    /// both cases the scene is left untouched.
    pub fn create<A, G>(
        params: &FireworkSpawnParams,
        resolution: Vec2,
        scene: &mut Scene,
        allocator: &mut A,
        rng: &mut G,
    ) -> Result<Self, FireworkError>
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
        G: Rng + ?Sized,
    {
        let count = params.validate()?;
        let particles = sample_shell(count, params.sphere_radius, rng);
        let material = FireworkMaterial {
            size: params.base_size,
            resolution,
            texture: params.texture,
            color: params.color,
            origin: params.origin,
            progress: 0.0,
        };

        let resources = allocator.allocate(&particles, &material)?;
        let id = scene.attach(params.origin);
        log::debug!(
            "Created firework {id}: {count} particles, radius {:.2} at {:?}",
            params.sphere_radius,
            params.origin
        );

        Ok(Self {
            id,
            particles,
            material,
            resources: Some(resources),
            state: FireworkState::Created,
            ramp: None,
        })
    }

    /// Start the 0→1 progress ramp over `duration`.
    ///
    /// Only valid once, on a freshly created firework. A second call returns
    /// [`FireworkError::InvalidState`] and leaves the running ramp alone.
    pub fn animate(&mut self, tweens: &mut TweenDriver, duration: Duration) -> Result<RampId, FireworkError> {
        if self.state != FireworkState::Created {
            log::warn!("Refusing to animate firework {} while {}", self.id, self.state.as_str());
            return Err(FireworkError::InvalidState {
                state: self.state.as_str(),
                operation: "animate",
            });
        }
        let ramp = tweens.schedule_ramp(self.id, 0.0, 1.0, duration);
        self.ramp = Some(ramp);
        self.state = FireworkState::Animating;
        Ok(ramp)
    }

    /// Set progress (clamped to `[0, 1]`) and push it to the GPU.
    /// Ignored once disposed.
    pub fn set_progress<A>(&mut self, progress: f32, allocator: &mut A)
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        if self.state == FireworkState::Disposed {
            return;
        }
        self.material.progress = progress.clamp(0.0, 1.0);
        self.push_material(allocator);
    }

    /// Set the render resolution and push it to the GPU.
    pub fn set_resolution<A>(&mut self, resolution: Vec2, allocator: &mut A)
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        self.material.resolution = resolution;
        self.push_material(allocator);
    }

    /// Set the base sprite size and push it to the GPU.
    pub fn set_size<A>(&mut self, size: f32, allocator: &mut A)
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        self.material.size = size;
        self.push_material(allocator);
    }

    fn push_material<A>(&mut self, allocator: &mut A)
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        if let Some(resources) = self.resources.as_mut() {
            allocator.update(resources, &self.material);
        }
    }

    /// Detach from the scene and release GPU resources.
    ///
    /// Returns `true` the first time. Disposing an already disposed
    /// firework is a no-op that returns `false`.
    pub fn dispose<A>(&mut self, scene: &mut Scene, allocator: &mut A) -> bool
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        if self.state == FireworkState::Disposed {
            return false;
        }
        scene.detach(self.id);
        if let Some(resources) = self.resources.take() {
            allocator.release(resources);
        }
        self.state = FireworkState::Disposed;
        self.ramp = None;
        log::debug!("Disposed firework {}", self.id);
        true
    }

    /// Scene handle.
    #[inline]
    pub fn id(&self) -> DrawableId {
        self.id
    }

    /// Lifecycle state.
    #[inline]
    pub fn state(&self) -> FireworkState {
        self.state
    }

    /// The ramp driving progress, while animating.
    #[inline]
    pub fn ramp(&self) -> Option<RampId> {
        self.ramp
    }

    /// Particle attributes.
    #[inline]
    pub fn particles(&self) -> &ParticleBuffer {
        &self.particles
    }

    /// Current shader parameters.
    #[inline]
    pub fn material(&self) -> &FireworkMaterial {
        &self.material
    }

    /// GPU resources, `None` after disposal.
    #[inline]
    pub fn resources(&self) -> Option<&R> {
        self.resources.as_ref()
    }
}
