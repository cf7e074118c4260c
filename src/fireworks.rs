//! Registry of live fireworks.
//!
//! [`Fireworks`] owns every [`FireworkInstance`] and the [`TweenDriver`]
//! animating them. Each frame [`Fireworks::update`] advances the ramps,
//! forwards progress ticks to the instances and disposes the ones whose
//! ramp completed.

use std::collections::HashMap;
use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use crate::allocator::ResourceAllocator;
use crate::error::FireworkError;
use crate::firework::{FireworkInstance, FireworkSpawnParams};
use crate::render_context::RenderContext;
use crate::scene::DrawableId;
use crate::tween::{RampEvent, TweenDriver};

/// Default length of a firework's progress ramp.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(3);

/// Owner of all live fireworks.
#[derive(Debug)]
pub struct Fireworks<R> {
    instances: HashMap<DrawableId, FireworkInstance<R>>,
    tweens: TweenDriver,
}

impl<R> Default for Fireworks<R> {
    fn default() -> Self {
        Self {
            instances: HashMap::new(),
            tweens: TweenDriver::new(),
        }
    }
}

impl<R> Fireworks<R> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a firework and keep it, without starting its ramp.
    pub fn create<A, G>(
        &mut self,
        ctx: &mut RenderContext,
        allocator: &mut A,
        params: &FireworkSpawnParams,
        rng: &mut G,
    ) -> Result<DrawableId, FireworkError>
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
        G: Rng + ?Sized,
    {
        let resolution = ctx.resolution();
        let instance = FireworkInstance::create(params, resolution, &mut ctx.scene, allocator, rng)?;
        let id = instance.id();
        self.instances.insert(id, instance);
        Ok(id)
    }

    /// Start the progress ramp of a created firework.
    pub fn animate(&mut self, id: DrawableId, duration: Duration) -> Result<(), FireworkError> {
        let instance = self.instances.get_mut(&id).ok_or(FireworkError::InvalidState {
            state: "disposed",
            operation: "animate",
        })?;
        instance.animate(&mut self.tweens, duration)?;
        Ok(())
    }

    /// Create a firework and immediately start its ramp.
    ///
    /// If the ramp cannot start the firework is disposed again, so a failed
    /// launch never leaves a frozen firework in the scene.
    pub fn launch<A, G>(
        &mut self,
        ctx: &mut RenderContext,
        allocator: &mut A,
        params: &FireworkSpawnParams,
        duration: Duration,
        rng: &mut G,
    ) -> Result<DrawableId, FireworkError>
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
        G: Rng + ?Sized,
    {
        let id = self.create(ctx, allocator, params, rng)?;
        if let Err(e) = self.animate(id, duration) {
            self.dispose(ctx, allocator, id);
            return Err(e);
        }
        Ok(id)
    }

    /// Dispose a firework now and forget it. Returns `false` if unknown.
    pub fn dispose<A>(&mut self, ctx: &mut RenderContext, allocator: &mut A, id: DrawableId) -> bool
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        match self.instances.remove(&id) {
            Some(mut instance) => {
                if let Some(ramp) = instance.ramp() {
                    self.tweens.cancel(ramp);
                }
                instance.dispose(&mut ctx.scene, allocator)
            }
            None => false,
        }
    }

    /// Advance every ramp by `dt`.
    ///
    /// Returns the ids disposed this frame, in completion order.
    pub fn update<A>(&mut self, ctx: &mut RenderContext, allocator: &mut A, dt: Duration) -> Vec<DrawableId>
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        let mut finished = Vec::new();
        for event in self.tweens.advance(dt) {
            match event {
                RampEvent::Tick { target, value } => {
                    if let Some(instance) = self.instances.get_mut(&target) {
                        instance.set_progress(value, allocator);
                    }
                }
                RampEvent::Complete { target } => {
                    if let Some(mut instance) = self.instances.remove(&target) {
                        if instance.dispose(&mut ctx.scene, allocator) {
                            finished.push(target);
                        }
                    }
                }
            }
        }
        finished
    }

    /// Push a new render resolution to every live firework.
    pub fn set_resolution<A>(&mut self, allocator: &mut A, resolution: Vec2)
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        for instance in self.instances.values_mut() {
            instance.set_resolution(resolution, allocator);
        }
    }

    /// Multiply the base sprite size of every live firework by `factor`.
    pub fn scale_size<A>(&mut self, allocator: &mut A, factor: f32)
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        for instance in self.instances.values_mut() {
            let size = instance.material().size * factor;
            instance.set_size(size, allocator);
        }
    }

    /// Dispose everything, e.g. on shutdown.
    pub fn clear<A>(&mut self, ctx: &mut RenderContext, allocator: &mut A)
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        for (_, mut instance) in self.instances.drain() {
            instance.dispose(&mut ctx.scene, allocator);
        }
        self.tweens = TweenDriver::new();
    }

    /// Look up a live firework.
    pub fn get(&self, id: DrawableId) -> Option<&FireworkInstance<R>> {
        self.instances.get(&id)
    }

    /// Number of live fireworks.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no fireworks are live.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of running progress ramps.
    pub fn animating(&self) -> usize {
        self.tweens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{HeadlessAllocator, HeadlessResources};
    use crate::firework::FireworkState;
    use crate::textures::TextureHandle;
    use glam::Vec3;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn params() -> FireworkSpawnParams {
        FireworkSpawnParams {
            particle_count: 32,
            origin: Vec3::new(0.5, 0.2, -0.3),
            base_size: 0.15,
            texture: TextureHandle::default(),
            sphere_radius: 0.4,
            color: Vec3::ONE,
        }
    }

    #[test]
    fn test_launch_then_complete() {
        let mut ctx = RenderContext::default();
        let mut alloc = HeadlessAllocator::new();
        let mut fireworks = Fireworks::<HeadlessResources>::new();
        let mut rng = SmallRng::seed_from_u64(1);

        let id = fireworks
            .launch(&mut ctx, &mut alloc, &params(), DEFAULT_DURATION, &mut rng)
            .unwrap();
        assert_eq!(fireworks.get(id).map(|f| f.state()), Some(FireworkState::Animating));
        assert_eq!(ctx.scene.get(id).map(|d| d.origin), Some(params().origin));

        assert!(fireworks.update(&mut ctx, &mut alloc, Duration::from_millis(1500)).is_empty());
        assert_eq!(fireworks.get(id).map(|f| f.material().progress), Some(0.5));

        let done = fireworks.update(&mut ctx, &mut alloc, Duration::from_millis(1600));
        assert_eq!(done, vec![id]);
        assert!(fireworks.is_empty());
        assert!(ctx.scene.is_empty());
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn test_manual_dispose_cancels_ramp() {
        let mut ctx = RenderContext::default();
        let mut alloc = HeadlessAllocator::new();
        let mut fireworks = Fireworks::<HeadlessResources>::new();
        let mut rng = SmallRng::seed_from_u64(2);

        let id = fireworks
            .launch(&mut ctx, &mut alloc, &params(), DEFAULT_DURATION, &mut rng)
            .unwrap();
        assert!(fireworks.dispose(&mut ctx, &mut alloc, id));
        assert!(!fireworks.dispose(&mut ctx, &mut alloc, id));
        assert_eq!(fireworks.animating(), 0);
        assert!(fireworks.update(&mut ctx, &mut alloc, Duration::from_secs(5)).is_empty());
        assert_eq!(alloc.released(), 1);
    }

    #[test]
    fn test_resolution_reaches_every_firework() {
        let mut ctx = RenderContext::default();
        let mut alloc = HeadlessAllocator::new();
        let mut fireworks = Fireworks::<HeadlessResources>::new();
        let mut rng = SmallRng::seed_from_u64(3);

        let a = fireworks.create(&mut ctx, &mut alloc, &params(), &mut rng).unwrap();
        let b = fireworks.create(&mut ctx, &mut alloc, &params(), &mut rng).unwrap();
        fireworks.set_resolution(&mut alloc, Vec2::new(320.0, 240.0));
        fireworks.scale_size(&mut alloc, 2.0);

        for id in [a, b] {
            let res = fireworks.get(id).and_then(|f| f.resources()).unwrap();
            assert_eq!(res.material.resolution, Vec2::new(320.0, 240.0));
            assert!((res.material.size - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut ctx = RenderContext::default();
        let mut alloc = HeadlessAllocator::new();
        let mut fireworks = Fireworks::<HeadlessResources>::new();
        let mut rng = SmallRng::seed_from_u64(4);

        for _ in 0..3 {
            fireworks
                .launch(&mut ctx, &mut alloc, &params(), DEFAULT_DURATION, &mut rng)
                .unwrap();
        }
        fireworks.clear(&mut ctx, &mut alloc);
        assert!(ctx.scene.is_empty());
        assert_eq!(alloc.live(), 0);
        assert_eq!(fireworks.animating(), 0);
    }
}
