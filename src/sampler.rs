//! Sphere-shell point sampling for firework bursts.
//!
//! Every firework is a cloud of points scattered through a thin spherical
//! shell. The shell is `[0.75 * radius, radius)` thick so the burst reads as
//! a ring of sparks rather than a solid ball.
//!
//! ```ignore
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let particles = fireburst::sampler::sample_shell(1_000, 0.5, &mut rng);
//! assert_eq!(particles.len(), 1_000);
//! ```

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

/// Inner radius of the shell as a fraction of the outer radius.
pub const SHELL_INNER_FRACTION: f32 = 0.75;

/// Per-particle attribute buffers for one firework.
///
/// Generated once by [`sample_shell`]. The three sequences always have the
/// same length and are never mutated afterwards, so the fields are private.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<Vec3>,
    size_factors: Vec<f32>,
    time_multipliers: Vec<f32>,
}

impl ParticleBuffer {
    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the buffer holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Local-space positions, relative to the firework origin.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-particle size factors in `[0, 1)`.
    #[inline]
    pub fn size_factors(&self) -> &[f32] {
        &self.size_factors
    }

    /// Per-particle progress multipliers in `[1, 2)`.
    ///
    /// A particle with multiplier 1.5 runs through its animation 1.5x faster
    /// than the firework's progress, so bursts fade out unevenly.
    #[inline]
    pub fn time_multipliers(&self) -> &[f32] {
        &self.time_multipliers
    }

    /// Iterate `(position, size_factor, time_multiplier)` per particle.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, f32, f32)> + '_ {
        self.positions
            .iter()
            .zip(&self.size_factors)
            .zip(&self.time_multipliers)
            .map(|((p, s), t)| (*p, *s, *t))
    }
}

/// Convert spherical coordinates to Cartesian.
///
/// * `radius` - distance from the origin
/// * `polar` - angle from +Y in `[0, PI]`
/// * `azimuth` - angle around Y in `[0, TAU)`, measured from +X towards +Z
#[inline]
pub fn spherical_to_cartesian(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let ring = radius * polar.sin();
    Vec3::new(ring * azimuth.cos(), radius * polar.cos(), ring * azimuth.sin())
}

/// Sample `count` particles in the shell `[0.75 * radius, radius)`.
///
/// Radius fraction, polar and azimuth angles are independent uniform draws,
/// so points bunch slightly towards the poles the same way the classic
/// spherical parameterization does. Also draws each particle's size factor
/// (`U`) and time multiplier (`1 + U`).
///
/// `count = 0` yields an empty buffer and `radius = 0` collapses every point
/// onto the origin. The result depends only on the inputs and the rng.
pub fn sample_shell<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> ParticleBuffer {
    let mut positions = Vec::with_capacity(count);
    let mut size_factors = Vec::with_capacity(count);
    let mut time_multipliers = Vec::with_capacity(count);

    for _ in 0..count {
        let r = radius * (SHELL_INNER_FRACTION + rng.gen::<f32>() * (1.0 - SHELL_INNER_FRACTION));
        let polar = PI * rng.gen::<f32>();
        let azimuth = TAU * rng.gen::<f32>();

        positions.push(spherical_to_cartesian(r, polar, azimuth));
        size_factors.push(rng.gen::<f32>());
        time_multipliers.push(1.0 + rng.gen::<f32>());
    }

    ParticleBuffer {
        positions,
        size_factors,
        time_multipliers,
    }
}
