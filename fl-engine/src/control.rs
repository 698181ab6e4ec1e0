pub mod camera;
pub mod controller;

/// Direction of a single movement step, relative to the camera basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// One input fetched from a controller during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Move(Movement),
    /// Mouse offsets, `y` positive when looking up.
    Look {
        x: f32,
        y: f32,
    },
    Zoom(f32),
    ToggleFly,
}

pub type Inputs = Vec<Input>;
