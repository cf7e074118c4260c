//! End-to-end firework lifecycle tests.
//!
//! These drive the registry, spawn controller and tween driver against a
//! [`HeadlessAllocator`], so they run without a GPU.

use std::time::Duration;

use fireburst::config::SpawnConfig;
use fireburst::prelude::*;
use fireburst::{HeadlessResources, RampEvent};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn cyan_burst() -> FireworkSpawnParams {
    FireworkSpawnParams {
        particle_count: 100,
        origin: Vec3::ZERO,
        base_size: 0.3,
        texture: TextureHandle::default(),
        sphere_radius: 1.0,
        color: Vec3::new(0.0, 1.0, 1.0),
    }
}

fn setup() -> (RenderContext, HeadlessAllocator, Fireworks<HeadlessResources>, SmallRng) {
    (
        RenderContext::default(),
        HeadlessAllocator::new(),
        Fireworks::new(),
        SmallRng::seed_from_u64(2024),
    )
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_create_adds_one_drawable_with_full_buffers() {
    let (mut ctx, mut alloc, mut fireworks, mut rng) = setup();

    let before = ctx.scene.len();
    let id = fireworks.create(&mut ctx, &mut alloc, &cyan_burst(), &mut rng).unwrap();
    assert_eq!(ctx.scene.len(), before + 1);

    let firework = fireworks.get(id).unwrap();
    let particles = firework.particles();
    assert_eq!(particles.positions().len(), 100);
    assert_eq!(particles.size_factors().len(), 100);
    assert_eq!(particles.time_multipliers().len(), 100);
    assert_eq!(firework.material().progress, 0.0);
    assert_eq!(firework.material().color, Vec3::new(0.0, 1.0, 1.0));
    assert_eq!(firework.material().resolution, ctx.resolution());

    for p in particles.positions() {
        let d = p.length();
        assert!((0.75 - 1e-4..=1.0 + 1e-4).contains(&d), "distance {d}");
    }
}

#[test]
fn test_negative_count_rejected_without_side_effects() {
    let (mut ctx, mut alloc, mut fireworks, mut rng) = setup();
    fireworks.create(&mut ctx, &mut alloc, &cyan_burst(), &mut rng).unwrap();
    let before = ctx.scene.len();

    let params = FireworkSpawnParams {
        particle_count: -1,
        ..cyan_burst()
    };
    let err = fireworks.create(&mut ctx, &mut alloc, &params, &mut rng).unwrap_err();

    assert!(matches!(err, FireworkError::InvalidParameter(_)));
    assert_eq!(ctx.scene.len(), before);
    assert_eq!(fireworks.len(), 1);
    assert_eq!(alloc.allocated(), 1);
}

#[test]
fn test_create_then_dispose_is_net_zero() {
    let (mut ctx, mut alloc, mut fireworks, mut rng) = setup();
    let before = ctx.scene.len();

    let id = fireworks.create(&mut ctx, &mut alloc, &cyan_burst(), &mut rng).unwrap();
    assert!(fireworks.dispose(&mut ctx, &mut alloc, id));

    assert_eq!(ctx.scene.len(), before);
    assert_eq!(alloc.live(), 0);
    assert!(fireworks.is_empty());
}

// ============================================================================
// Animation
// ============================================================================

#[test]
fn test_progress_ramps_to_exactly_one_then_disposes_once() {
    let mut scene = Scene::new();
    let mut alloc = HeadlessAllocator::new();
    let mut tweens = TweenDriver::new();
    let mut rng = SmallRng::seed_from_u64(9);

    let mut firework: FireworkInstance<HeadlessResources> =
        FireworkInstance::create(&cyan_burst(), Vec2::new(1280.0, 720.0), &mut scene, &mut alloc, &mut rng)
            .unwrap();
    assert_eq!(firework.material().progress, 0.0);

    let duration = Duration::from_secs(3);
    firework.animate(&mut tweens, duration).unwrap();

    let step = Duration::from_millis(16);
    let mut elapsed = Duration::ZERO;
    let mut progress = vec![firework.material().progress];
    let mut disposals = 0;

    while elapsed < duration + Duration::from_millis(200) {
        elapsed += step;
        for event in tweens.advance(step) {
            match event {
                RampEvent::Tick { value, .. } => {
                    firework.set_progress(value, &mut alloc);
                    progress.push(firework.material().progress);
                }
                RampEvent::Complete { .. } => {
                    assert_eq!(firework.material().progress, 1.0);
                    if firework.dispose(&mut scene, &mut alloc) {
                        disposals += 1;
                    }
                }
            }
        }
    }

    assert!(progress.windows(2).all(|w| w[1] > w[0]), "progress must strictly increase");
    assert_eq!(progress.last().copied(), Some(1.0));
    assert_eq!(progress.iter().filter(|p| **p == 1.0).count(), 1);
    assert_eq!(disposals, 1);
    assert_eq!(firework.state(), FireworkState::Disposed);
    assert!(scene.is_empty());
    assert_eq!(alloc.released(), 1);
}

#[test]
fn test_second_animate_does_not_restart() {
    let (mut ctx, mut alloc, mut fireworks, mut rng) = setup();
    let id = fireworks
        .launch(&mut ctx, &mut alloc, &cyan_burst(), DEFAULT_DURATION, &mut rng)
        .unwrap();

    fireworks.update(&mut ctx, &mut alloc, Duration::from_secs(2));
    let err = fireworks.animate(id, DEFAULT_DURATION).unwrap_err();
    assert!(matches!(err, FireworkError::InvalidState { .. }));
    assert_eq!(fireworks.animating(), 1);

    // The first ramp still ends on schedule
    let done = fireworks.update(&mut ctx, &mut alloc, Duration::from_millis(1100));
    assert_eq!(done, vec![id]);
}

#[test]
fn test_registry_reports_each_completion_once() {
    let (mut ctx, mut alloc, mut fireworks, mut rng) = setup();
    let id = fireworks
        .launch(&mut ctx, &mut alloc, &cyan_burst(), DEFAULT_DURATION, &mut rng)
        .unwrap();

    let mut completions = Vec::new();
    for _ in 0..250 {
        completions.extend(fireworks.update(&mut ctx, &mut alloc, Duration::from_millis(16)));
    }

    assert_eq!(completions, vec![id]);
    assert_eq!(alloc.released(), 1);
}

// ============================================================================
// Spawning
// ============================================================================

#[test]
fn test_sequential_spawns_all_clean_up() {
    let (mut ctx, mut alloc, mut fireworks, _) = setup();
    let palette = TexturePalette::procedural(8);
    let mut spawner = SpawnController::new(SpawnConfig {
        seed: Some(5),
        ..SpawnConfig::default()
    });

    for _ in 0..5 {
        let id = spawner.trigger(&mut fireworks, &mut ctx, &mut alloc, &palette).unwrap();
        assert!(ctx.scene.contains(id));
        for _ in 0..31 {
            fireworks.update(&mut ctx, &mut alloc, Duration::from_millis(100));
        }
        assert!(!ctx.scene.contains(id));
    }

    assert!(ctx.scene.is_empty());
    assert!(fireworks.is_empty());
    assert_eq!(alloc.allocated(), 5);
    assert_eq!(alloc.live(), 0);
    assert_eq!(spawner.launched(), 5);
}

#[test]
fn test_overlapping_spawns_finish_in_launch_order() {
    let (mut ctx, mut alloc, mut fireworks, _) = setup();
    let palette = TexturePalette::procedural(8);
    let mut spawner = SpawnController::new(SpawnConfig {
        seed: Some(6),
        ..SpawnConfig::default()
    });

    let first = spawner.trigger(&mut fireworks, &mut ctx, &mut alloc, &palette).unwrap();
    fireworks.update(&mut ctx, &mut alloc, Duration::from_secs(1));
    let second = spawner.trigger(&mut fireworks, &mut ctx, &mut alloc, &palette).unwrap();

    let order: Vec<DrawableId> = ctx.scene.iter().map(|d| d.id).collect();
    assert_eq!(order, vec![first, second]);

    assert_eq!(fireworks.update(&mut ctx, &mut alloc, Duration::from_millis(2100)), vec![first]);
    assert_eq!(fireworks.update(&mut ctx, &mut alloc, Duration::from_secs(1)), vec![second]);
    assert!(ctx.scene.is_empty());
}

#[test]
fn test_allocation_failure_is_dropped_and_loop_continues() {
    let mut ctx = RenderContext::default();
    let mut alloc = HeadlessAllocator::with_capacity(2);
    let mut fireworks = Fireworks::<HeadlessResources>::new();
    let palette = TexturePalette::procedural(8);
    let mut spawner = SpawnController::new(SpawnConfig {
        seed: Some(7),
        ..SpawnConfig::default()
    });

    for _ in 0..4 {
        spawner.trigger(&mut fireworks, &mut ctx, &mut alloc, &palette);
    }
    assert_eq!(spawner.launched(), 2);
    assert_eq!(spawner.dropped(), 2);
    assert_eq!(ctx.scene.len(), 2);

    // Capacity frees up once the first wave finishes
    fireworks.update(&mut ctx, &mut alloc, Duration::from_secs(4));
    assert!(spawner.trigger(&mut fireworks, &mut ctx, &mut alloc, &palette).is_some());
}

#[test]
fn test_resize_updates_live_materials() {
    let (mut ctx, mut alloc, mut fireworks, mut rng) = setup();
    let id = fireworks
        .launch(&mut ctx, &mut alloc, &cyan_burst(), DEFAULT_DURATION, &mut rng)
        .unwrap();

    let resolution = ctx.resize(Viewport::new(800.0, 600.0, 3.0));
    fireworks.set_resolution(&mut alloc, resolution);

    assert_eq!(resolution, Vec2::new(1600.0, 1200.0));
    let res = fireworks.get(id).and_then(|f| f.resources()).unwrap();
    assert_eq!(res.material.resolution, resolution);
    assert!((ctx.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
}
