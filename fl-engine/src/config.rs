//! Configuration for the camera, key bindings and window.
//!
//! Every struct uses `#[serde(default)]` so a partial TOML file only overrides
//! the values it names.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::render::window::Mode;
use crate::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub keybindings: KeyBindings,
    pub window: WindowConfig,
    pub projection: ProjectionConfig,
}

impl Config {
    /// Loads a config from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let mut config: Self = toml::from_str(content)?;
        config.check_finite()?;
        config.keybindings.rebuild_reverse_map();
        Ok(config)
    }

    /// Rejects NaN and infinite values, which the camera clamps cannot handle.
    fn check_finite(&self) -> Result<(), Error> {
        let camera = &self.camera;
        let values = [
            ("camera.position", camera.position.iter().all(|v| v.is_finite())),
            ("camera.world_up", camera.world_up.iter().all(|v| v.is_finite())),
            ("camera.yaw", camera.yaw.is_finite()),
            ("camera.pitch", camera.pitch.is_finite()),
            ("camera.speed", camera.speed.is_finite()),
            ("camera.sensitivity", camera.sensitivity.is_finite()),
            ("camera.fov", camera.fov.is_finite()),
            ("camera.min_fov", camera.min_fov.is_finite()),
            ("camera.max_fov", camera.max_fov.is_finite()),
            ("camera.pitch_limit", camera.pitch_limit.is_finite()),
            ("projection.near", self.projection.near.is_finite()),
            ("projection.far", self.projection.far.is_finite()),
            (
                "window.position",
                self.window
                    .position
                    .map_or(true, |position| position.iter().all(|v| v.is_finite())),
            ),
        ];
        match values.iter().find(|(_, finite)| !finite) {
            Some((name, _)) => Err(Error::InvalidConfig(format!("{name} must be finite"))),
            None => Ok(()),
        }
    }
}

/// How `handle_mouse_scroll` clamps the field of view from below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollClamp {
    /// The result is clamped to `[min_fov, max_fov]`.
    #[default]
    Clamped,
    /// Lower bound compared against `-min_fov`: values in `(-min_fov, min_fov)` are kept
    /// and scrolling freezes there, since the guard only admits values inside the range.
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Initial state and tunables of a free-look camera.
pub struct CameraConfig {
    pub position: [f32; 3],
    pub world_up: [f32; 3],
    /// Degrees. `-90` faces down -Z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// Units per second.
    pub speed: f32,
    /// Degrees per pixel of mouse movement.
    pub sensitivity: f32,
    /// Initial vertical field of view, in degrees.
    pub fov: f32,
    pub min_fov: f32,
    pub max_fov: f32,
    pub pitch_limit: f32,
    pub can_fly: bool,
    pub scroll_clamp: ScrollClamp,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            world_up: [0.0, 1.0, 0.0],
            yaw: -90.0,
            pitch: 0.0,
            speed: 2.5,
            sensitivity: 0.1,
            fov: 45.0,
            min_fov: 1.0,
            max_fov: 45.0,
            pitch_limit: 89.0,
            can_fly: true,
            scroll_clamp: ScrollClamp::Clamped,
        }
    }
}

/// Action a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Forward,
    Backward,
    Left,
    Right,
    ToggleFly,
    Exit,
}

/// Maps actions to key strings in the `winit::keyboard::KeyCode` debug format
/// (`"KeyW"`, `"Escape"`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub bindings: HashMap<KeyAction, String>,
    /// Reverse lookup cache, rebuilt on load.
    #[serde(skip)]
    key_to_action: HashMap<String, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyAction::Forward, "KeyW".to_string()),
            (KeyAction::Backward, "KeyS".to_string()),
            (KeyAction::Left, "KeyA".to_string()),
            (KeyAction::Right, "KeyD".to_string()),
            (KeyAction::ToggleFly, "KeyF".to_string()),
            (KeyAction::Exit, "Escape".to_string()),
        ]);
        let mut keybindings = Self {
            bindings,
            key_to_action: HashMap::new(),
        };
        keybindings.rebuild_reverse_map();
        keybindings
    }
}

impl PartialEq for KeyBindings {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl KeyBindings {
    /// When several actions share a key, the first in declaration order wins.
    pub fn rebuild_reverse_map(&mut self) {
        let mut bindings = self.bindings.iter().collect::<Vec<_>>();
        bindings.sort_unstable();

        self.key_to_action.clear();
        for (action, key) in bindings {
            if let Some(kept) = self.key_to_action.get(key) {
                tracing::warn!(
                    "Key {key} is bound to both {kept:?} and {action:?}, ignoring {action:?}"
                );
                continue;
            }
            let _ = self.key_to_action.insert(key.clone(), *action);
        }
    }

    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }

    /// Binds `action` to `key`, replacing its previous key.
    pub fn bind(&mut self, action: KeyAction, key: impl Into<String>) {
        let _ = self.bindings.insert(action, key.into());
        self.rebuild_reverse_map();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// Logical position of the top-left corner, windowed mode only.
    pub position: Option<[f32; 2]>,
    pub mode: Mode,
    pub resizable: bool,
    pub cursor_locked: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "FreeLook".to_string(),
            width: 800,
            height: 600,
            min_width: 180,
            min_height: 120,
            position: None,
            mode: Mode::Windowed,
            resizable: true,
            cursor_locked: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml_str(&content).unwrap();
        assert_eq!(config, parsed);
        assert_eq!(parsed.keybindings.lookup("KeyW"), Some(KeyAction::Forward));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let content = r#"
[camera]
position = [0.0, 0.0, 3.0]
scroll_clamp = "legacy"

[window]
title = "Shadows"
"#;
        let config = Config::from_toml_str(content).unwrap();
        assert_eq!(config.camera.position, [0.0, 0.0, 3.0]);
        assert_eq!(config.camera.scroll_clamp, ScrollClamp::Legacy);
        assert_eq!(config.camera.speed, 2.5);
        assert_eq!(config.window.title, "Shadows");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.projection.far, 100.0);
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let content = r#"
[keybindings.bindings]
forward = "ArrowUp"
exit = "KeyQ"
"#;
        let config = Config::from_toml_str(content).unwrap();
        assert_eq!(
            config.keybindings.lookup("ArrowUp"),
            Some(KeyAction::Forward)
        );
        assert_eq!(config.keybindings.lookup("KeyQ"), Some(KeyAction::Exit));
        assert_eq!(config.keybindings.lookup("KeyW"), None);
    }

    #[test]
    fn rebinding_drops_old_key() {
        let mut keybindings = KeyBindings::default();
        keybindings.bind(KeyAction::Forward, "KeyZ");
        assert_eq!(keybindings.lookup("KeyZ"), Some(KeyAction::Forward));
        assert_eq!(keybindings.lookup("KeyW"), None);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        for content in [
            "[camera]\npitch_limit = nan",
            "[camera]\nmin_fov = nan",
            "[camera]\nmax_fov = inf",
            "[camera]\nposition = [0.0, -inf, 0.0]",
            "[projection]\nfar = nan",
            "[window]\nposition = [nan, 0.0]",
        ] {
            assert!(
                matches!(Config::from_toml_str(content), Err(Error::InvalidConfig(_))),
                "{content}"
            );
        }
    }

    #[test]
    fn shared_key_keeps_first_action() {
        let mut keybindings = KeyBindings::default();
        keybindings.bind(KeyAction::Exit, "KeyW");
        assert_eq!(keybindings.lookup("KeyW"), Some(KeyAction::Forward));
        keybindings.bind(KeyAction::Forward, "KeyZ");
        assert_eq!(keybindings.lookup("KeyW"), Some(KeyAction::Exit));
        assert_eq!(keybindings.lookup("KeyZ"), Some(KeyAction::Forward));
    }

    #[test]
    fn window_mode_and_position_parse() {
        let content = r#"
[window]
mode = "borderless_fullscreen"
position = [40.0, 60.0]
"#;
        let config = Config::from_toml_str(content).unwrap();
        assert_eq!(config.window.mode, Mode::BorderlessFullscreen);
        assert_eq!(config.window.position, Some([40.0, 60.0]));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[camera]\nspeed = \"fast\""),
            Err(Error::ConfigParse(_))
        ));
    }
}
