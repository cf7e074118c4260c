//! State shared by everything that touches the scene.
//!
//! The application builds one [`RenderContext`] and lends it to the spawn
//! controller, the firework registry and the renderer. GPU objects live in
//! [`crate::gpu::GpuState`]; this struct is plain data so it can be driven
//! headlessly in tests.

use glam::Vec2;

use crate::camera::Camera;
use crate::scene::Scene;

/// Largest device pixel ratio honored. Higher-density displays are rendered
/// at 2x to bound fill rate.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Logical window size plus pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
    /// Device pixel ratio, clamped to [`MAX_PIXEL_RATIO`].
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Viewport from logical size and the window's scale factor.
    pub fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: scale_factor.clamp(f32::MIN_POSITIVE, MAX_PIXEL_RATIO),
        }
    }

    /// Render resolution in pixels: `size * pixel_ratio`.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * self.pixel_ratio
    }

    /// Width / height, or 1 for a degenerate viewport.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

/// Scene, camera and viewport, owned once by the application.
#[derive(Debug, Default)]
pub struct RenderContext {
    /// Live drawables.
    pub scene: Scene,
    /// Active camera.
    pub camera: Camera,
    /// Current window size.
    pub viewport: Viewport,
}

impl RenderContext {
    /// Create a context with an empty scene.
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        let mut ctx = Self {
            scene: Scene::new(),
            camera,
            viewport,
        };
        ctx.camera.set_viewport(viewport.width, viewport.height);
        ctx
    }

    /// Apply a window resize. Returns the new render resolution.
    pub fn resize(&mut self, viewport: Viewport) -> Vec2 {
        self.viewport = viewport;
        self.camera.set_viewport(viewport.width, viewport.height);
        viewport.resolution()
    }

    /// Render resolution in pixels.
    pub fn resolution(&self) -> Vec2 {
        self.viewport.resolution()
    }
}
