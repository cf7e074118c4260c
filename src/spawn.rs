//! Random firework spawning.
//!
//! The [`SpawnController`] turns a trigger (a click, or startup) into a
//! randomized [`FireworkSpawnParams`] and launches it. A launch that fails
//! is logged and dropped; the next click simply tries again.

use std::ops::Range;
use std::time::Duration;

use glam::Vec3;
use rand::distributions::uniform::SampleUniform;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::allocator::ResourceAllocator;
use crate::config::{InitialFirework, SpawnConfig};
use crate::firework::FireworkSpawnParams;
use crate::fireworks::Fireworks;
use crate::render_context::RenderContext;
use crate::scene::DrawableId;
use crate::textures::TexturePalette;

/// Draws spawn parameters and launches fireworks.
pub struct SpawnController {
    config: SpawnConfig,
    rng: SmallRng,
    launched: u64,
    dropped: u64,
}

impl SpawnController {
    /// Controller with the given ranges. Uses `config.seed` if set,
    /// otherwise seeds from the OS.
    pub fn new(config: SpawnConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            config,
            rng,
            launched: 0,
            dropped: 0,
        }
    }

    /// Ranges in use.
    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Ramp duration for every launch.
    pub fn duration(&self) -> Duration {
        self.config.duration()
    }

    /// Fireworks launched successfully.
    pub fn launched(&self) -> u64 {
        self.launched
    }

    /// Spawns that failed and were dropped.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Draw a random set of spawn parameters.
    pub fn next_params(&mut self, palette: &TexturePalette) -> FireworkSpawnParams {
        let cfg = &self.config;
        let rng = &mut self.rng;

        let particle_count = sample_range(rng, cfg.count_range());
        let lo = cfg.origin_min();
        let hi = cfg.origin_max();
        let origin = Vec3::new(
            sample_range(rng, lo.x..hi.x),
            sample_range(rng, lo.y..hi.y),
            sample_range(rng, lo.z..hi.z),
        );
        let base_size = sample_range(rng, cfg.size_range());
        let texture = palette.choose(rng).unwrap_or_default();
        let sphere_radius = sample_range(rng, cfg.radius_range());
        let color = hsl_to_rgb(rng.gen::<f32>(), cfg.saturation, cfg.lightness);

        FireworkSpawnParams {
            particle_count,
            origin,
            base_size,
            texture,
            sphere_radius,
            color,
        }
    }

    /// Launch one random firework.
    ///
    /// Returns the new drawable, or `None` if the spawn was dropped.
    pub fn trigger<R, A>(
        &mut self,
        fireworks: &mut Fireworks<R>,
        ctx: &mut RenderContext,
        allocator: &mut A,
        palette: &TexturePalette,
    ) -> Option<DrawableId>
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        let params = self.next_params(palette);
        self.launch(fireworks, ctx, allocator, &params)
    }

    /// Launch a specific firework with this controller's duration.
    pub fn launch<R, A>(
        &mut self,
        fireworks: &mut Fireworks<R>,
        ctx: &mut RenderContext,
        allocator: &mut A,
        params: &FireworkSpawnParams,
    ) -> Option<DrawableId>
    where
        A: ResourceAllocator<Resources = R> + ?Sized,
    {
        let duration = self.duration();
        match fireworks.launch(ctx, allocator, params, duration, &mut self.rng) {
            Ok(id) => {
                self.launched += 1;
                log::debug!(
                    "Launched firework {id} ({} particles, {} live)",
                    params.particle_count,
                    fireworks.len()
                );
                Some(id)
            }
            Err(e) => {
                self.dropped += 1;
                log::warn!("Dropped firework spawn: {e}");
                None
            }
        }
    }
}

impl InitialFirework {
    /// Spawn parameters for this firework. Out-of-range palette slots fall
    /// back to the first texture.
    pub fn params(&self, palette: &TexturePalette) -> FireworkSpawnParams {
        FireworkSpawnParams {
            particle_count: self.count,
            origin: Vec3::from_array(self.position),
            base_size: self.size,
            texture: palette.handle(self.texture).unwrap_or_default(),
            sphere_radius: self.radius,
            color: Vec3::from_array(self.color),
        }
    }
}

/// `[start, end)`, or `start` for an empty range.
fn sample_range<T, R>(rng: &mut R, range: Range<T>) -> T
where
    T: SampleUniform + PartialOrd + Copy,
    R: Rng + ?Sized,
{
    if range.end > range.start {
        rng.gen_range(range)
    } else {
        range.start
    }
}

/// Convert HSL to RGB.
///
/// * `hue` - 0.0 to 1.0, wraps
/// * `saturation` - 0.0 (gray) to 1.0 (vivid)
/// * `lightness` - 0.0 (black) to 1.0 (white), 0.5 is the pure hue
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{HeadlessAllocator, HeadlessResources};

    fn seeded() -> SpawnController {
        SpawnController::new(SpawnConfig {
            seed: Some(1234),
            ..SpawnConfig::default()
        })
    }

    #[test]
    fn test_params_within_ranges() {
        let palette = TexturePalette::procedural(8);
        let mut controller = seeded();
        for _ in 0..200 {
            let p = controller.next_params(&palette);
            assert!((400..1400).contains(&p.particle_count));
            assert!((-1.0..1.0).contains(&p.origin.x));
            assert!((0.0..1.0).contains(&p.origin.y));
            assert!((-1.0..1.0).contains(&p.origin.z));
            assert!((0.1..0.2).contains(&p.base_size));
            assert!((0.0..0.5).contains(&p.sphere_radius));
            assert!(p.texture.index() < 8);
            assert!(p.color.min_element() >= -1e-6 && p.color.max_element() <= 1.0 + 1e-6);
            assert!(p.validate().is_ok());
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let palette = TexturePalette::procedural(8);
        let a = seeded().next_params(&palette);
        let b = seeded().next_params(&palette);
        assert_eq!(a, b);
    }

    #[test]
    fn test_failed_spawn_is_dropped() {
        let palette = TexturePalette::procedural(8);
        let mut controller = seeded();
        let mut ctx = RenderContext::default();
        let mut alloc = HeadlessAllocator::with_capacity(1);
        let mut fireworks = Fireworks::<HeadlessResources>::new();

        assert!(controller.trigger(&mut fireworks, &mut ctx, &mut alloc, &palette).is_some());
        assert!(controller.trigger(&mut fireworks, &mut ctx, &mut alloc, &palette).is_none());
        assert_eq!(controller.launched(), 1);
        assert_eq!(controller.dropped(), 1);
        assert_eq!(ctx.scene.len(), 1);
    }

    #[test]
    fn test_initial_firework_params() {
        let palette = TexturePalette::procedural(8);
        let p = InitialFirework::default().params(&palette);
        assert_eq!(p.particle_count, 100);
        assert_eq!(p.sphere_radius, 1.0);
        assert_eq!(p.base_size, 0.3);
        assert_eq!(p.color, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(p.texture.index(), 7);

        let empty = TexturePalette::default();
        assert_eq!(InitialFirework::default().params(&empty).texture.index(), 0);
    }

    #[test]
    fn test_hsl_to_rgb() {
        // Pure red at half lightness
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);

        // Cyan
        let cyan = hsl_to_rgb(0.5, 1.0, 0.5);
        assert!((cyan - Vec3::new(0.0, 1.0, 1.0)).length() < 1e-5);

        // Lightness 0.7 keeps full saturation but lifts the floor
        let light = hsl_to_rgb(0.0, 1.0, 0.7);
        assert!((light - Vec3::new(1.0, 0.4, 0.4)).length() < 1e-5);

        // Grey when unsaturated
        let grey = hsl_to_rgb(0.3, 0.0, 0.25);
        assert!((grey - Vec3::splat(0.25)).length() < 1e-6);
    }
}
