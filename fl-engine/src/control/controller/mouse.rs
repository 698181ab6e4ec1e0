use winit::event::{DeviceEvent, MouseScrollDelta, WindowEvent};

use super::super::{Input, Inputs};

/// Pixel scroll deltas (touchpads) worth one wheel notch.
const PIXELS_PER_LINE: f64 = 20.0;

#[derive(Copy, Clone, Debug, Default)]
/// Represents the state of a mouse.
///
/// A free cursor is tracked through its window positions, turned into offsets
/// against the previous position; the first position after creation or `reset`
/// only primes the tracker. A locked cursor stops reporting useful positions,
/// so raw device motion is used instead, while the window has focus.
/// Offsets and scroll lines are accumulated until fetched.
pub struct Mouse {
    locked: bool,
    unfocused: bool,
    last_position: Option<(f64, f64)>,
    look_delta: (f32, f32),
    scroll_delta: f32,
}

impl Mouse {
    /// `locked` must match whether the window grabs the cursor.
    #[must_use]
    pub fn new(locked: bool) -> Self {
        Self {
            locked,
            ..Self::default()
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if self.locked {
            return;
        }
        if let Some((last_x, last_y)) = self.last_position {
            self.look_delta.0 += (x - last_x) as f32;
            // Window y grows downwards.
            self.look_delta.1 += (last_y - y) as f32;
        }
        self.last_position = Some((x, y));
    }

    /// Raw relative motion, y growing downwards.
    #[allow(clippy::cast_possible_truncation)]
    pub fn moved(&mut self, delta_x: f64, delta_y: f64) {
        if !self.locked || self.unfocused {
            return;
        }
        self.look_delta.0 += delta_x as f32;
        self.look_delta.1 -= delta_y as f32;
    }

    pub fn scrolled(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    /// Forgets the last cursor position so the next one does not produce a jump.
    pub fn reset(&mut self) {
        self.last_position = None;
    }
}

impl super::Controller for Mouse {
    fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position.x, position.y),
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.scrolled(*y),
                #[allow(clippy::cast_possible_truncation)]
                MouseScrollDelta::PixelDelta(position) => {
                    self.scrolled((position.y / PIXELS_PER_LINE) as f32);
                }
            },
            WindowEvent::CursorLeft { .. } => self.reset(),
            WindowEvent::Focused(focused) => {
                self.unfocused = !focused;
                self.reset();
            }
            _ => (),
        }
    }

    fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion {
            delta: (delta_x, delta_y),
        } = event
        {
            self.moved(*delta_x, *delta_y);
        }
    }

    fn fetch_input(&mut self) -> Inputs {
        let (x, y) = core::mem::take(&mut self.look_delta);
        let zoom = core::mem::take(&mut self.scroll_delta);

        let mut inputs = Vec::with_capacity(2);
        if x != 0.0 || y != 0.0 {
            inputs.push(Input::Look { x, y });
        }
        if zoom != 0.0 {
            inputs.push(Input::Zoom(zoom));
        }

        inputs
    }
}
