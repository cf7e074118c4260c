//! Perspective orbit camera.
//!
//! Drags and scrolls feed angular/zoom velocity which decays every frame,
//! so the view keeps drifting briefly after the pointer stops.

use glam::{Mat4, Vec3};

/// Orbit camera for viewing fireworks.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Fraction of orbit velocity removed each frame (0 = no damping).
    pub damping: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
}

const PITCH_LIMIT: f32 = 1.5;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 50.0;
const ROTATE_SPEED: f32 = 0.005;
const ZOOM_SPEED: f32 = 0.3;

impl Camera {
    /// Camera at `position` looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(MIN_DISTANCE);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self {
            yaw,
            pitch,
            distance,
            target,
            fov_y_degrees: 25.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            damping: 0.05,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection for the current aspect ratio.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view_matrix()
    }

    /// Update the aspect ratio after a resize. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Queue an orbit by a pointer drag of `(dx, dy)` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity -= dx * ROTATE_SPEED;
        self.pitch_velocity += dy * ROTATE_SPEED;
    }

    /// Queue a zoom by `scroll` wheel lines. Positive zooms in.
    pub fn zoom(&mut self, scroll: f32) {
        self.zoom_velocity -= scroll * ZOOM_SPEED;
    }

    /// Apply queued motion. Call once per frame.
    pub fn update(&mut self) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance + self.zoom_velocity).clamp(MIN_DISTANCE, MAX_DISTANCE);

        let keep = if self.damping > 0.0 {
            (1.0 - self.damping).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.yaw_velocity *= keep;
        self.pitch_velocity *= keep;
        self.zoom_velocity *= keep;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(1.5, 0.0, 6.0), Vec3::ZERO)
    }
}
