#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use render::{window::WindowDescriptor, Projection};
use state::AppState;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

pub mod config;
pub mod control;
pub mod render;
pub mod state;

mod error;

pub use error::Error;

/// Frames between two camera status reports.
const REPORT_INTERVAL: u64 = 240;

pub struct FreeLookAppConfig {
    pub window: WindowDescriptor,
    pub camera: Box<dyn control::camera::Camera>,
    pub controllers: Vec<Box<dyn control::controller::Controller>>,
    pub projection: config::ProjectionConfig,
}

pub struct FreeLookApp {
    descriptor: WindowDescriptor,
    state: AppState,
    window: Option<Window>,
    error: Option<Error>,
    frame_count: u64,
}

impl FreeLookApp {
    #[must_use]
    pub fn new(config: FreeLookAppConfig) -> Self {
        let FreeLookAppConfig {
            window,
            camera,
            controllers,
            projection,
        } = config;
        let projection = Projection::new(window.width, window.height, &projection);

        Self {
            descriptor: window,
            state: AppState::new(camera, controllers, projection),
            window: None,
            error: None,
            frame_count: 0,
        }
    }

    /// Runs the event loop until the window is closed or an exit key is pressed.
    pub fn run(mut self) -> Result<(), Error> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        tracing::debug!("Event loop exited after {} frames", self.frame_count);
        self.error.take().map_or(Ok(()), Err)
    }

    fn redraw(&mut self) {
        let frame = self.state.next_frame();
        self.frame_count += 1;

        if self.frame_count % REPORT_INTERVAL == 0 {
            tracing::debug!(
                "Frame {}: position {:?}, fov {:.1}",
                self.frame_count,
                frame.position,
                frame.fov
            );
        }

        // TODO: Upload `frame.view` and `frame.projection` once a renderer is attached.
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for FreeLookApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(self.descriptor.attributes(event_loop)) {
            Ok(window) => window,
            Err(err) => {
                tracing::error!("Failed to create window: {err}");
                self.error = Some(err.into());
                event_loop.exit();
                return;
            }
        };

        if let Some(name) = window.current_monitor().and_then(|monitor| monitor.name()) {
            tracing::info!("Window created on monitor {}", name);
        }

        self.descriptor.apply_cursor(&window);
        self.state.handle_event(&WindowEvent::Resized(window.inner_size()));
        self.state.restart_clock();

        window.request_redraw();
        self.window = Some(window);
        tracing::debug!("Successfully initialized");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::debug!("Close requested");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            event => {
                self.state.handle_event(&event);
                if self.state.exit_requested() {
                    event_loop.exit();
                }
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        self.state.handle_device_event(&event);
    }
}
