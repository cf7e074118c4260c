//! Window and event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`]. It owns the
//! [`RenderContext`], the firework registry and the renderer, and routes
//! pointer gestures to the spawn controller and the camera.
//!
//! Controls:
//!
//! - click: launch a firework
//! - drag: orbit the camera
//! - wheel: zoom
//! - Space: pause / resume
//! - `+` / `-`: grow or shrink live sprites
//! - Escape: quit

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::FireworksConfig;
use crate::error::AppError;
use crate::fireworks::Fireworks;
use crate::gpu::{FireworkGpu, GpuState};
use crate::input::{PointerEvent, PointerInput};
use crate::render_context::{RenderContext, Viewport};
use crate::spawn::SpawnController;
use crate::textures::TexturePalette;
use crate::time::FrameClock;

/// Factor applied per `+` / `-` press.
const SIZE_STEP: f32 = 1.25;

/// Frames between fps trace lines.
const FPS_LOG_INTERVAL: u64 = 600;

/// Open a window and run until it is closed.
pub fn run(config: FireworksConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// The running application.
pub struct App {
    config: FireworksConfig,
    palette: TexturePalette,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    ctx: RenderContext,
    fireworks: Fireworks<FireworkGpu>,
    spawner: SpawnController,
    input: PointerInput,
    clock: FrameClock,
    error: Option<AppError>,
}

impl App {
    /// Load the sprite palette and prepare state. The window and GPU are
    /// created when the event loop resumes.
    pub fn new(config: FireworksConfig) -> Self {
        let palette = TexturePalette::load_dir(&config.textures.directory, config.textures.count);
        let viewport = Viewport::new(config.window.width as f32, config.window.height as f32, 1.0);
        let ctx = RenderContext::new(config.camera.camera(), viewport);
        let spawner = SpawnController::new(config.spawn.clone());
        let clock = config.clock.clock();

        Self {
            config,
            palette,
            window: None,
            gpu: None,
            ctx,
            fireworks: Fireworks::new(),
            spawner,
            input: PointerInput::new(),
            clock,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let gpu = pollster::block_on(GpuState::new(window.clone(), &self.palette))?;
        self.gpu = Some(gpu);
        self.resize(window.inner_size(), window.scale_factor());
        self.window = Some(window);

        // Measure the first frame from here, not from construction
        self.clock = self.config.clock.clock();

        if let Some(initial) = &self.config.initial {
            let params = initial.params(&self.palette);
            if let Some(gpu) = self.gpu.as_ref() {
                let mut allocator = gpu.allocator();
                self.spawner
                    .launch(&mut self.fireworks, &mut self.ctx, &mut allocator, &params);
            }
        }

        log::info!("Click to launch fireworks");
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let Some(viewport) = viewport_for(size, scale_factor) else {
            return;
        };
        let resolution = self.ctx.resize(viewport);

        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(size.width, size.height);
            let mut allocator = gpu.allocator();
            self.fireworks.set_resolution(&mut allocator, resolution);
        }
        log::debug!("Resized to {}x{} (resolution {resolution})", size.width, size.height);
    }

    fn pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Click { .. } => {
                if let Some(gpu) = self.gpu.as_ref() {
                    let mut allocator = gpu.allocator();
                    self.spawner
                        .trigger(&mut self.fireworks, &mut self.ctx, &mut allocator, &self.palette);
                }
            }
            PointerEvent::Drag { dx, dy } => self.ctx.camera.orbit(dx, dy),
            PointerEvent::Scroll(lines) => self.ctx.camera.zoom(lines),
        }
    }

    fn key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Space => {
                self.clock.toggle_pause();
                log::info!("{}", if self.clock.is_paused() { "Paused" } else { "Resumed" });
            }
            KeyCode::Equal | KeyCode::NumpadAdd => self.scale_sprites(SIZE_STEP),
            KeyCode::Minus | KeyCode::NumpadSubtract => self.scale_sprites(1.0 / SIZE_STEP),
            _ => {}
        }
    }

    fn scale_sprites(&mut self, factor: f32) {
        if let Some(gpu) = self.gpu.as_ref() {
            let mut allocator = gpu.allocator();
            self.fireworks.scale_size(&mut allocator, factor);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();
        if self.clock.frame() % FPS_LOG_INTERVAL == 0 {
            log::trace!("frame {} at {:.1} fps", self.clock.frame(), self.clock.fps());
        }
        self.ctx.camera.update();

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        {
            let mut allocator = gpu.allocator();
            let finished = self.fireworks.update(&mut self.ctx, &mut allocator, dt);
            if !finished.is_empty() {
                log::debug!("{} fireworks finished, {} live", finished.len(), self.fireworks.len());
            }
        }

        match gpu.render(&self.ctx, &self.fireworks) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Dropped frame: {e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Startup failed: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(pointer) = self.input.handle_event(&event) {
            self.pointer(pointer);
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.resize(size, scale_factor);
            }
            // The new physical size arrives with the Resized event that follows
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::debug!("Scale factor changed to {scale_factor}");
            }
            WindowEvent::KeyboardInput { event, .. } => self.key(event_loop, &event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = self.gpu.as_ref() {
            let mut allocator = gpu.allocator();
            self.fireworks.clear(&mut self.ctx, &mut allocator);
        }
        log::info!(
            "Launched {} fireworks ({} dropped) in {:.1}s",
            self.spawner.launched(),
            self.spawner.dropped(),
            self.clock.elapsed().as_secs_f32()
        );
    }
}

/// Logical viewport for a physical surface size. `None` while minimized.
fn viewport_for(size: PhysicalSize<u32>, scale_factor: f64) -> Option<Viewport> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    let scale_factor = scale_factor as f32;
    Some(Viewport::new(
        size.width as f32 / scale_factor,
        size.height as f32 / scale_factor,
        scale_factor,
    ))
}
