//! Per-window application state.
//!
//! Everything a frame needs (camera, controllers, viewport size, frame timing)
//! lives here and is passed to the event handlers by reference.

use std::time::Instant;

use glam::{Mat4, Vec3};
use winit::event::{DeviceEvent, WindowEvent};

use crate::control::camera::Camera;
use crate::control::controller::Controller;
use crate::control::Inputs;
use crate::render::Projection;

/// Matrices and camera values for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    pub view: Mat4,
    pub projection: Mat4,
    pub fov: f32,
    pub position: Vec3,
}

#[derive(Copy, Clone, Debug)]
/// Measures the time between consecutive frames.
pub struct FrameClock {
    last_frame: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }
}

impl FrameClock {
    /// Returns the seconds elapsed since the previous tick (or creation).
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        elapsed
    }
}

pub struct AppState {
    camera: Box<dyn Camera>,
    controllers: Vec<Box<dyn Controller>>,
    projection: Projection,
    clock: FrameClock,
}

impl AppState {
    #[must_use]
    pub fn new(
        camera: Box<dyn Camera>,
        controllers: Vec<Box<dyn Controller>>,
        projection: Projection,
    ) -> Self {
        Self {
            camera,
            controllers,
            projection,
            clock: FrameClock::default(),
        }
    }

    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Resized(size) = event {
            self.projection.resize(size.width, size.height);
        }
        for controller in &mut self.controllers {
            controller.handle_event(event);
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        for controller in &mut self.controllers {
            controller.handle_device_event(event);
        }
    }

    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.controllers
            .iter()
            .any(|controller| controller.exit_requested())
    }

    /// Feeds this frame's inputs to the camera and returns the resulting matrices.
    pub fn update(&mut self, delta_seconds: f32) -> Frame {
        let inputs = self
            .controllers
            .iter_mut()
            .flat_map(|controller| controller.fetch_input())
            .collect::<Inputs>();
        self.camera.process_inputs(&inputs, delta_seconds);

        let fov = self.camera.fov();
        Frame {
            view: self.camera.view_matrix(),
            projection: self.projection.matrix(fov),
            fov,
            position: self.camera.position(),
        }
    }

    /// Ticks the frame clock, then updates with the elapsed time.
    pub fn next_frame(&mut self) -> Frame {
        let delta_seconds = self.clock.tick();
        self.update(delta_seconds)
    }

    /// Restarts frame timing, so the first frame does not include startup time.
    pub fn restart_clock(&mut self) {
        self.clock = FrameClock::default();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::control::camera::free_look::FreeLook;
    use crate::control::controller::{keyboard::Keyboard, mouse::Mouse};
    use crate::control::{Input, Movement};

    /// Replays a fixed list of inputs every frame.
    struct Scripted(Inputs);

    impl Controller for Scripted {
        fn handle_event(&mut self, _event: &WindowEvent) {}

        fn fetch_input(&mut self) -> Inputs {
            self.0.clone()
        }
    }

    #[test]
    fn update_moves_camera_and_builds_matrices() {
        let mut state = AppState::new(
            Box::new(FreeLook::new()),
            vec![Box::new(Scripted(vec![
                Input::Move(Movement::Forward),
                Input::Zoom(5.0),
            ]))],
            Projection::default(),
        );

        let frame = state.update(0.5);
        assert!(frame.position.abs_diff_eq(Vec3::new(0.0, 0.0, -1.25), 1e-5));
        assert_abs_diff_eq!(frame.fov, 40.0);
        assert_eq!(frame.projection, Projection::default().matrix(40.0));
        assert!(frame
            .view
            .transform_point3(frame.position)
            .abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn inputs_from_every_controller_are_applied() {
        let mut keyboard = Keyboard::default();
        keyboard.press("KeyD");
        let mut mouse = Mouse::default();
        mouse.scrolled(2.0);

        let mut state = AppState::new(
            Box::new(FreeLook::new()),
            vec![Box::new(keyboard), Box::new(mouse)],
            Projection::default(),
        );
        let frame = state.update(1.0);
        assert!(frame.position.abs_diff_eq(Vec3::new(2.5, 0.0, 0.0), 1e-5));
        assert_abs_diff_eq!(frame.fov, 43.0);
        assert!(!state.exit_requested());
    }

    #[test]
    fn device_motion_turns_locked_camera() {
        let mut state = AppState::new(
            Box::new(FreeLook::new()),
            vec![Box::new(Mouse::new(true))],
            Projection::default(),
        );
        state.handle_device_event(&DeviceEvent::MouseMotion {
            delta: (1_800.0, 0.0),
        });
        // 180 degrees: facing +Z instead of -Z.
        let frame = state.update(0.0);
        let ahead = frame.view.transform_point3(Vec3::new(0.0, 0.0, 1.0));
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn exit_request_is_visible() {
        let mut keyboard = Keyboard::default();
        keyboard.press("Escape");
        let state = AppState::new(
            Box::new(FreeLook::new()),
            vec![Box::new(keyboard)],
            Projection::default(),
        );
        assert!(state.exit_requested());
    }

    #[test]
    fn clock_is_monotonic() {
        let mut clock = FrameClock::default();
        assert!(clock.tick() >= 0.0);
        assert!(clock.tick() >= 0.0);
    }
}
