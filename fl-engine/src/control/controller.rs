//! This module contains the necessary trait used to handle different kind
//! of controllers, i.e. input sources.
//!
//! To implement a controller, simply create a struct with internal states and
//! implement the `Controller` trait for it.
//! Add it to the list of controllers in the app config and it will be
//! automatically fed by the event loop.

pub mod keyboard;
pub mod mouse;

/// Represents a controller.
///
/// A controller is responsible for handling events and
/// is used by structs that implement `Camera` to fetch inputs.
pub trait Controller {
    /// Handle a window event, usually by filtering by event type and
    /// updating the controller's state accordingly.
    fn handle_event(&mut self, event: &winit::event::WindowEvent);

    /// Handle a raw device event, e.g. mouse motion while the cursor is grabbed.
    fn handle_device_event(&mut self, _event: &winit::event::DeviceEvent) {}

    /// Fetch the inputs from the controller's state.
    ///
    /// Called once per frame, this will be used by the `Camera` to update its state.
    fn fetch_input(&mut self) -> super::Inputs;

    /// Whether the controller asked for the app to exit.
    fn exit_requested(&self) -> bool {
        false
    }
}
