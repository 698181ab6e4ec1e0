use glam::{Mat4, Vec3};

use super::super::{Input, Movement};
use crate::config::{CameraConfig, ScrollClamp};

/// Below this squared length `front x world_up` is treated as degenerate.
const DEGENERATE_EPSILON: f32 = 1e-6;

#[derive(Copy, Clone, Debug)]
/// Represents a free-look camera driven by yaw and pitch, without roll.
///
/// `front`, `right` and `up` are always derived from `yaw`, `pitch` and
/// `world_up`, never mutated on their own.
pub struct FreeLook {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    can_fly: bool,
    speed: f32,
    sensitivity: f32,
    min_fov: f32,
    max_fov: f32,
    pitch_limit: f32,
    scroll_clamp: ScrollClamp,
}

impl Default for FreeLook {
    fn default() -> Self {
        Self::with_config(&CameraConfig::default())
    }
}

impl FreeLook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_vectors(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        Self::with_config(&CameraConfig {
            position: position.to_array(),
            world_up: world_up.to_array(),
            yaw,
            pitch,
            ..CameraConfig::default()
        })
    }

    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_scalars(
        pos_x: f32,
        pos_y: f32,
        pos_z: f32,
        up_x: f32,
        up_y: f32,
        up_z: f32,
        yaw: f32,
        pitch: f32,
    ) -> Self {
        Self::from_vectors(
            Vec3::new(pos_x, pos_y, pos_z),
            Vec3::new(up_x, up_y, up_z),
            yaw,
            pitch,
        )
    }

    #[must_use]
    pub fn with_config(config: &CameraConfig) -> Self {
        let min_fov = config.min_fov;
        let mut max_fov = config.max_fov;
        if max_fov < min_fov {
            tracing::debug!(
                "The given maximum fov {} is smaller than the minimum fov {}",
                max_fov,
                min_fov
            );
            max_fov = min_fov;
        }

        let yaw_radians = config.yaw.to_radians();
        let mut camera = Self {
            position: Vec3::from_array(config.position),
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            // Seed for the degenerate fallback in `update_vectors`.
            right: Vec3::new(-yaw_radians.sin(), 0.0, yaw_radians.cos()),
            world_up: Vec3::from_array(config.world_up),
            yaw: config.yaw,
            pitch: config.pitch,
            fov: config.fov.clamp(min_fov, max_fov),
            can_fly: config.can_fly,
            speed: config.speed,
            sensitivity: config.sensitivity,
            min_fov,
            max_fov,
            pitch_limit: config.pitch_limit.abs(),
            scroll_clamp: config.scroll_clamp,
        };
        camera.update_vectors();
        camera
    }

    /// Right-handed look-at transform from `position` towards `position + front`.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    #[must_use]
    pub const fn fov(&self) -> f32 {
        self.fov
    }

    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub const fn front(&self) -> Vec3 {
        self.front
    }

    #[must_use]
    pub const fn right(&self) -> Vec3 {
        self.right
    }

    #[must_use]
    pub const fn up(&self) -> Vec3 {
        self.up
    }

    #[must_use]
    pub const fn world_up(&self) -> Vec3 {
        self.world_up
    }

    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    #[must_use]
    pub const fn can_fly(&self) -> bool {
        self.can_fly
    }

    pub fn set_can_fly(&mut self, can_fly: bool) {
        self.can_fly = can_fly;
    }

    /// Moves the camera by `speed * delta_seconds` along its basis.
    ///
    /// When the camera cannot fly, only the vertical part of the step is undone:
    /// a tilted `front` still shortens the horizontal step.
    pub fn handle_keyboard(&mut self, direction: Movement, delta_seconds: f32) {
        let velocity = self.speed * delta_seconds;
        let previous_y = self.position.y;

        match direction {
            Movement::Forward => self.position += self.front * velocity,
            Movement::Backward => self.position -= self.front * velocity,
            Movement::Left => self.position -= self.right * velocity,
            Movement::Right => self.position += self.right * velocity,
        }

        if !self.can_fly {
            self.position.y = previous_y;
        }
    }

    pub fn handle_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.sensitivity;
        self.pitch += y_offset * self.sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-self.pitch_limit, self.pitch_limit);
        }

        self.update_vectors();
    }

    /// Zooms in for positive offsets.
    pub fn handle_mouse_scroll(&mut self, y_offset: f32) {
        if (self.min_fov..=self.max_fov).contains(&self.fov) {
            self.fov -= y_offset;
        }

        match self.scroll_clamp {
            ScrollClamp::Clamped => self.fov = self.fov.clamp(self.min_fov, self.max_fov),
            ScrollClamp::Legacy => {
                if self.fov < -self.min_fov {
                    self.fov = self.min_fov;
                }
                if self.fov > self.max_fov {
                    self.fov = self.max_fov;
                }
            }
        }
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();

        self.front = Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        )
        .normalize();

        let right = self.front.cross(self.world_up);
        self.right = if right.length_squared() > DEGENERATE_EPSILON {
            right.normalize()
        } else {
            tracing::debug!(
                "Front is parallel to world up (pitch {}), keeping previous right",
                self.pitch
            );
            let previous = self.right - self.front * self.right.dot(self.front);
            previous
                .try_normalize()
                .unwrap_or_else(|| Vec3::new(-yaw.sin(), 0.0, yaw.cos()))
        };

        self.up = self.right.cross(self.front).normalize();
    }
}

impl super::Camera for FreeLook {
    fn view_matrix(&self) -> Mat4 {
        Self::view_matrix(self)
    }

    fn fov(&self) -> f32 {
        self.fov
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn front(&self) -> Vec3 {
        self.front
    }

    fn up(&self) -> Vec3 {
        self.up
    }

    fn right(&self) -> Vec3 {
        self.right
    }

    fn process_inputs(&mut self, inputs: &[Input], delta_seconds: f32) {
        for input in inputs {
            match *input {
                Input::Move(direction) => self.handle_keyboard(direction, delta_seconds),
                Input::Look { x, y } => self.handle_mouse_movement(x, y, true),
                Input::Zoom(y) => self.handle_mouse_scroll(y),
                Input::ToggleFly => {
                    self.can_fly = !self.can_fly;
                    tracing::debug!("Flying {}", if self.can_fly { "enabled" } else { "disabled" });
                }
            }
        }
    }
}
