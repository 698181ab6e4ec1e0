use glam::{Mat4, Vec3};

pub mod free_look;

/// Represents a camera.
///
/// It is expected that all vectors (except for `position`) are normalized.
pub trait Camera {
    /// Returns the world-to-view transform.
    fn view_matrix(&self) -> Mat4;
    /// Returns the vertical field of view, in degrees.
    fn fov(&self) -> f32;
    /// Returns the position of the camera.
    fn position(&self) -> Vec3;
    /// Returns the direction the camera is facing.
    fn front(&self) -> Vec3;
    /// Returns the up vector of the camera.
    fn up(&self) -> Vec3;
    /// Returns the right vector of the camera.
    fn right(&self) -> Vec3;

    /// Processes the inputs and updates the camera.
    fn process_inputs(&mut self, inputs: &[super::Input], delta_seconds: f32);
}
