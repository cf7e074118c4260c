//! Pointer input.
//!
//! [`PointerInput`] turns raw winit mouse events into [`PointerEvent`]s. A
//! left press followed by a release that moved less than
//! [`CLICK_SLOP`] pixels is a click; anything further is a drag, which
//! orbits the camera instead of spawning.
//!
//! ```ignore
//! for event in input.handle_event(&window_event) {
//!     match event {
//!         PointerEvent::Click { .. } => spawner.trigger(..),
//!         PointerEvent::Drag { dx, dy } => ctx.camera.orbit(dx, dy),
//!         PointerEvent::Scroll(lines) => ctx.camera.zoom(lines),
//!     }
//! }
//! ```

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Largest total pointer travel, in pixels, that still counts as a click.
pub const CLICK_SLOP: f32 = 4.0;

/// Pixel scroll is divided by this to approximate wheel lines.
const PIXELS_PER_LINE: f32 = 10.0;

/// High-level pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Left button pressed and released in place.
    Click {
        /// Cursor position in physical pixels.
        position: Vec2,
    },
    /// Cursor moved with the left button held.
    Drag {
        /// Horizontal movement in pixels.
        dx: f32,
        /// Vertical movement in pixels.
        dy: f32,
    },
    /// Wheel movement in lines. Positive is away from the user.
    Scroll(f32),
}

/// Left-button and wheel tracker.
#[derive(Debug, Default)]
pub struct PointerInput {
    position: Vec2,
    pressed: bool,
    travel: f32,
}

impl PointerInput {
    /// Create a new tracker with the button released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor position in physical pixels.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Whether the left button is held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Feed a window event. Non-pointer events produce nothing.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.press();
                    None
                }
                ElementState::Released => self.release(),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::CursorLeft { .. } => {
                self.pressed = false;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                Some(PointerEvent::Scroll(lines))
            }
            _ => None,
        }
    }

    /// Left button went down at the current position.
    pub fn press(&mut self) {
        self.pressed = true;
        self.travel = 0.0;
    }

    /// Left button went up. Returns a click if the cursor stayed put.
    pub fn release(&mut self) -> Option<PointerEvent> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        (self.travel < CLICK_SLOP).then_some(PointerEvent::Click {
            position: self.position,
        })
    }

    /// Cursor moved to `position`. Returns a drag while the button is held.
    pub fn moved(&mut self, position: Vec2) -> Option<PointerEvent> {
        let delta = position - self.position;
        self.position = position;
        if !self.pressed {
            return None;
        }
        self.travel += delta.length();
        Some(PointerEvent::Drag {
            dx: delta.x,
            dy: delta.y,
        })
    }
}
