use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

use super::super::{Input, Inputs, Movement};
use crate::config::{KeyAction, KeyBindings};

#[derive(Clone, Debug, Default)]
/// Represents the state of a keyboard.
///
/// Movement keys are reported every frame while held, the fly toggle once per press.
pub struct Keyboard {
    bindings: KeyBindings,
    held: u8,
    toggle_fly: bool,
    exit: bool,
}

impl Keyboard {
    const FORWARD: u8 = 1 << 0;
    const BACKWARD: u8 = 1 << 1;
    const LEFT: u8 = 1 << 2;
    const RIGHT: u8 = 1 << 3;

    const MOVEMENTS: [Movement; 4] = [
        Movement::Forward,
        Movement::Backward,
        Movement::Left,
        Movement::Right,
    ];

    #[must_use]
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    const fn mask(direction: Movement) -> u8 {
        match direction {
            Movement::Forward => Self::FORWARD,
            Movement::Backward => Self::BACKWARD,
            Movement::Left => Self::LEFT,
            Movement::Right => Self::RIGHT,
        }
    }

    /// `key` uses the `winit::keyboard::KeyCode` debug format, e.g. `"KeyW"`.
    pub fn press(&mut self, key: &str) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: &str) {
        self.set(key, false);
    }

    fn set(&mut self, key: &str, pressed: bool) {
        let Some(action) = self.bindings.lookup(key) else {
            return;
        };

        let direction = match action {
            KeyAction::Forward => Movement::Forward,
            KeyAction::Backward => Movement::Backward,
            KeyAction::Left => Movement::Left,
            KeyAction::Right => Movement::Right,
            KeyAction::ToggleFly => {
                self.toggle_fly |= pressed;
                return;
            }
            KeyAction::Exit => {
                if pressed {
                    tracing::debug!("Exit key {key} pressed");
                }
                self.exit |= pressed;
                return;
            }
        };

        let mask = Self::mask(direction);
        self.held = self.held & !mask | (mask * u8::from(pressed));
    }

    #[must_use]
    pub const fn is_held(&self, direction: Movement) -> bool {
        let mask = Self::mask(direction);
        self.held & mask == mask
    }
}

impl super::Controller for Keyboard {
    fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                if event.repeat {
                    return;
                }
                let key = format!("{code:?}");
                match event.state {
                    ElementState::Pressed => self.press(&key),
                    ElementState::Released => self.release(&key),
                }
            }
            // Keys released while unfocused never report a release.
            WindowEvent::Focused(false) => self.held = 0,
            _ => (),
        }
    }

    fn fetch_input(&mut self) -> Inputs {
        let mut inputs = Self::MOVEMENTS
            .into_iter()
            .filter(|direction| self.is_held(*direction))
            .map(Input::Move)
            .collect::<Inputs>();

        if core::mem::take(&mut self.toggle_fly) {
            inputs.push(Input::ToggleFly);
        }

        inputs
    }

    fn exit_requested(&self) -> bool {
        self.exit
    }
}

#[cfg(test)]
mod tests {
    use super::super::Controller;
    use super::*;

    #[test]
    fn held_keys_repeat_every_frame() {
        let mut keyboard = Keyboard::default();
        keyboard.press("KeyW");
        keyboard.press("KeyD");
        let expected = vec![Input::Move(Movement::Forward), Input::Move(Movement::Right)];
        assert_eq!(keyboard.fetch_input(), expected);
        assert_eq!(keyboard.fetch_input(), expected);

        keyboard.release("KeyW");
        assert_eq!(keyboard.fetch_input(), vec![Input::Move(Movement::Right)]);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut keyboard = Keyboard::default();
        keyboard.press("KeyZ");
        assert!(keyboard.fetch_input().is_empty());
    }

    #[test]
    fn fly_toggle_fires_once_per_press() {
        let mut keyboard = Keyboard::default();
        keyboard.press("KeyF");
        assert_eq!(keyboard.fetch_input(), vec![Input::ToggleFly]);
        assert!(keyboard.fetch_input().is_empty());
        keyboard.release("KeyF");
        assert!(keyboard.fetch_input().is_empty());
    }

    #[test]
    fn escape_requests_exit() {
        let mut keyboard = Keyboard::default();
        assert!(!keyboard.exit_requested());
        keyboard.press("Escape");
        assert!(keyboard.exit_requested());
    }

    #[test]
    fn custom_bindings() {
        let mut bindings = KeyBindings::default();
        bindings.bind(KeyAction::Forward, "ArrowUp");
        let mut keyboard = Keyboard::new(bindings);
        keyboard.press("KeyW");
        assert!(!keyboard.is_held(Movement::Forward));
        keyboard.press("ArrowUp");
        assert!(keyboard.is_held(Movement::Forward));
    }
}
