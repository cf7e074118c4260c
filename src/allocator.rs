//! GPU resource allocation for fireworks.
//!
//! A firework never touches wgpu directly. It asks a [`ResourceAllocator`]
//! for its buffers once, pushes material changes through it every tick and
//! hands the resources back on disposal. The wgpu implementation lives in
//! [`crate::gpu::WgpuAllocator`]; [`HeadlessAllocator`] keeps only
//! bookkeeping and is what tests and benchmarks run against.

use crate::error::FireworkError;
use crate::firework::FireworkMaterial;
use crate::sampler::ParticleBuffer;

/// Creates, updates and releases the GPU side of a firework.
pub trait ResourceAllocator {
    /// Whatever the backend needs to draw one firework.
    type Resources;

    /// Upload particle attributes and create the material.
    fn allocate(
        &mut self,
        particles: &ParticleBuffer,
        material: &FireworkMaterial,
    ) -> Result<Self::Resources, FireworkError>;

    /// Push changed material parameters (progress, resolution, size).
    fn update(&mut self, resources: &mut Self::Resources, material: &FireworkMaterial);

    /// Free the resources. Called at most once per allocation.
    fn release(&mut self, resources: Self::Resources);
}

/// Bookkeeping record standing in for GPU buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessResources {
    /// Allocation serial number.
    pub serial: u64,
    /// Particles uploaded.
    pub particle_count: usize,
    /// Last material pushed through [`ResourceAllocator::update`].
    pub material: FireworkMaterial,
    /// Number of updates received.
    pub updates: u64,
}

/// Allocator that tracks live allocations without a GPU.
///
/// With a capacity set, allocations beyond it fail with
/// [`FireworkError::ResourceAllocation`], which is how tests exercise the
/// out-of-memory path.
#[derive(Debug, Default)]
pub struct HeadlessAllocator {
    capacity: Option<usize>,
    live: usize,
    allocated: u64,
    released: u64,
}

impl HeadlessAllocator {
    /// Allocator with unlimited capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that refuses to hold more than `capacity` live fireworks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Allocations not yet released.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Total successful allocations.
    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    /// Total releases.
    pub fn released(&self) -> u64 {
        self.released
    }
}

impl ResourceAllocator for HeadlessAllocator {
    type Resources = HeadlessResources;

    fn allocate(
        &mut self,
        particles: &ParticleBuffer,
        material: &FireworkMaterial,
    ) -> Result<Self::Resources, FireworkError> {
        if let Some(capacity) = self.capacity {
            if self.live >= capacity {
                return Err(FireworkError::ResourceAllocation(format!(
                    "headless capacity of {capacity} fireworks exhausted"
                )));
            }
        }
        self.live += 1;
        self.allocated += 1;
        Ok(HeadlessResources {
            serial: self.allocated,
            particle_count: particles.len(),
            material: material.clone(),
            updates: 0,
        })
    }

    fn update(&mut self, resources: &mut Self::Resources, material: &FireworkMaterial) {
        resources.material = material.clone();
        resources.updates += 1;
    }

    fn release(&mut self, _resources: Self::Resources) {
        self.live = self.live.saturating_sub(1);
        self.released += 1;
    }
}
