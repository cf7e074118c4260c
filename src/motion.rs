//! Per-particle animation curves.
//!
//! These are the same curves the vertex shader evaluates (see
//! [`crate::shader::FIREWORK_SHADER`]). Keeping a CPU copy lets tests pin
//! down the animation and lets tooling answer "where is particle `i` at
//! progress `p`" without a GPU.
//!
//! All curves take the particle's local progress, which is the firework's
//! progress times the particle's time multiplier, so fast particles finish
//! their animation before the firework's ramp ends.

use glam::Vec3;

/// Local progress at which the burst is fully open.
pub const EXPLODE_END: f32 = 0.1;
/// Local progress at which sprites reach full size.
pub const SCALE_PEAK: f32 = 0.125;
/// How far particles drop over the falling phase.
pub const FALL_DISTANCE: f32 = 0.2;
/// Angular frequency of the twinkle.
pub const TWINKLE_FREQUENCY: f32 = 30.0;

/// Linearly map `value` from `[in_min, in_max]` to `[out_min, out_max]`.
/// Not clamped.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

#[inline]
fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Scale applied to the rest position while the burst opens, `0 → 1`.
pub fn explode(progress: f32) -> f32 {
    ease_out_cubic(remap(progress, 0.0, EXPLODE_END, 0.0, 1.0).clamp(0.0, 1.0))
}

/// Downward offset after the burst opens, `0 → FALL_DISTANCE`.
pub fn fall(progress: f32) -> f32 {
    ease_out_cubic(remap(progress, EXPLODE_END, 1.0, 0.0, 1.0).clamp(0.0, 1.0)) * FALL_DISTANCE
}

/// Sprite size multiplier: grows to 1 by [`SCALE_PEAK`], shrinks to 0 by 1.
pub fn scale(progress: f32) -> f32 {
    let opening = remap(progress, 0.0, SCALE_PEAK, 0.0, 1.0);
    let closing = remap(progress, SCALE_PEAK, 1.0, 1.0, 0.0);
    opening.min(closing).clamp(0.0, 1.0)
}

/// Sprite size flicker, active between 20% and 80% local progress.
pub fn twinkle(progress: f32) -> f32 {
    let strength = remap(progress, 0.2, 0.8, 0.0, 1.0).clamp(0.0, 1.0);
    let wave = (progress * TWINKLE_FREQUENCY).sin() * 0.5 + 0.5;
    1.0 - wave * strength
}

/// Local-space position of a particle resting at `rest`.
pub fn displaced_position(rest: Vec3, progress: f32) -> Vec3 {
    let mut p = rest * explode(progress);
    p.y -= fall(progress);
    p
}

/// Combined size multiplier (`scale * twinkle`).
pub fn size_multiplier(progress: f32) -> f32 {
    scale(progress) * twinkle(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap() {
        assert_eq!(remap(0.5, 0.0, 1.0, 10.0, 20.0), 15.0);
        assert_eq!(remap(2.0, 0.0, 1.0, 0.0, 1.0), 2.0);
    }

    #[test]
    fn test_explode_opens_early() {
        assert_eq!(explode(0.0), 0.0);
        assert!(explode(0.05) > 0.5);
        assert_eq!(explode(EXPLODE_END), 1.0);
        assert_eq!(explode(1.5), 1.0);
    }

    #[test]
    fn test_fall_starts_after_explosion() {
        assert_eq!(fall(0.0), 0.0);
        assert_eq!(fall(EXPLODE_END), 0.0);
        assert!((fall(1.0) - FALL_DISTANCE).abs() < 1e-6);
    }

    #[test]
    fn test_scale_peaks_then_vanishes() {
        assert_eq!(scale(0.0), 0.0);
        assert!((scale(SCALE_PEAK) - 1.0).abs() < 1e-6);
        assert_eq!(scale(1.0), 0.0);
        // Fast particles (multiplier up to 2) stay invisible past the end
        assert_eq!(scale(1.7), 0.0);
    }

    #[test]
    fn test_no_twinkle_outside_window() {
        assert_eq!(twinkle(0.1), 1.0);
        assert!((0.0..=1.0).contains(&twinkle(0.5)));
    }

    #[test]
    fn test_displaced_position() {
        let rest = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(displaced_position(rest, 0.0), Vec3::ZERO);
        let end = displaced_position(rest, 1.0);
        assert!((end - Vec3::new(1.0, -FALL_DISTANCE, 0.0)).length() < 1e-6);
        assert_eq!(size_multiplier(1.0), 0.0);
    }
}
