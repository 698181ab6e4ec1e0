use winit::{
    dpi::{LogicalPosition, LogicalSize},
    event_loop::ActiveEventLoop,
    monitor::{MonitorHandle, VideoModeHandle},
    window::{CursorGrabMode, Fullscreen, Window, WindowAttributes},
};

use serde::{Deserialize, Serialize};

use crate::config::WindowConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Represents the mode of the window.
pub enum Mode {
    Windowed,
    BorderlessFullscreen,
    Fullscreen,
}

#[derive(Debug, Clone, PartialEq)]
/// Represents a window descriptor.
pub struct WindowDescriptor {
    pub width: u32,
    pub height: u32,
    pub position: Option<[f32; 2]>,
    pub resize_constraints: ResizeConstraints,
    pub title: String,
    pub resizable: bool,
    pub cursor_visible: bool,
    pub cursor_locked: bool,
    pub mode: Mode,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: "FreeLook".to_string(),
            width: 800,
            height: 600,
            position: None,
            resize_constraints: ResizeConstraints::default(),
            resizable: true,
            cursor_locked: false,
            cursor_visible: true,
            mode: Mode::Windowed,
        }
    }
}

impl From<&WindowConfig> for WindowDescriptor {
    fn from(config: &WindowConfig) -> Self {
        Self {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            position: config.position,
            resize_constraints: ResizeConstraints {
                min_width: config.min_width,
                min_height: config.min_height,
                ..ResizeConstraints::default()
            },
            resizable: config.resizable,
            cursor_locked: config.cursor_locked,
            cursor_visible: !config.cursor_locked,
            mode: config.mode,
        }
    }
}

impl WindowDescriptor {
    #[must_use]
    /// Builds the `winit` attributes of the window.
    pub fn attributes(&self, event_loop: &ActiveEventLoop) -> WindowAttributes {
        let attributes = Window::default_attributes().with_title(&self.title);

        let mut attributes = match self.mode {
            Mode::BorderlessFullscreen => attributes.with_fullscreen(Some(Fullscreen::Borderless(
                event_loop.primary_monitor(),
            ))),
            Mode::Fullscreen => {
                let video_mode = event_loop
                    .primary_monitor()
                    .and_then(|monitor| best_video_mode(&monitor));
                if let Some(video_mode) = video_mode {
                    tracing::debug!(
                        "Best video mode: {}x{} @ {}Hz",
                        video_mode.size().width,
                        video_mode.size().height,
                        video_mode.refresh_rate_millihertz() / 1000
                    );
                    attributes.with_fullscreen(Some(Fullscreen::Exclusive(video_mode)))
                } else {
                    tracing::warn!("No video mode available, falling back to borderless");
                    attributes.with_fullscreen(Some(Fullscreen::Borderless(None)))
                }
            }
            Mode::Windowed => {
                let attributes = match self.position {
                    Some([x, y]) => attributes
                        .with_position(LogicalPosition::new(f64::from(x), f64::from(y))),
                    None => attributes,
                };
                attributes
                    .with_inner_size(LogicalSize::new(self.width, self.height))
                    .with_resizable(self.resizable)
            }
        };

        let constraints = self.resize_constraints.check_constraints();
        attributes = attributes.with_min_inner_size(LogicalSize::new(
            constraints.min_width,
            constraints.min_height,
        ));
        if constraints.max_width < u32::MAX && constraints.max_height < u32::MAX {
            attributes = attributes.with_max_inner_size(LogicalSize::new(
                constraints.max_width,
                constraints.max_height,
            ));
        }

        attributes
    }

    /// Applies cursor visibility and confinement to a created window.
    pub fn apply_cursor(&self, window: &Window) {
        if self.cursor_locked {
            match window.set_cursor_grab(if cfg!(target_os = "macos") {
                CursorGrabMode::Locked
            } else {
                CursorGrabMode::Confined
            }) {
                Ok(()) => (),
                Err(winit::error::ExternalError::NotSupported(_)) => {
                    tracing::warn!("Cursor confinement is not supported on this platform");
                }
                Err(err) => tracing::error!("Error confining cursor: {err:?}"),
            }
        }

        window.set_cursor_visible(self.cursor_visible);
    }
}

/// Returns the largest, fastest video mode of the given monitor.
fn best_video_mode(monitor: &MonitorHandle) -> Option<VideoModeHandle> {
    monitor.video_modes().max_by_key(|mode| {
        (
            mode.size().width,
            mode.size().height,
            mode.refresh_rate_millihertz(),
        )
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Represents the constraints for resizing a window.
pub struct ResizeConstraints {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ResizeConstraints {
    fn default() -> Self {
        Self {
            min_width: 180,
            min_height: 120,
            max_width: u32::MAX,
            max_height: u32::MAX,
        }
    }
}

impl ResizeConstraints {
    #[must_use]
    /// Returns a copy where every bound is at least one pixel and no maximum is
    /// below its minimum.
    pub fn check_constraints(&self) -> Self {
        let min_width = self.min_width.max(1);
        let min_height = self.min_height.max(1);
        if self.max_width < min_width || self.max_height < min_height {
            tracing::debug!(
                "Maximum size {}x{} is smaller than minimum size {}x{}",
                self.max_width,
                self.max_height,
                min_width,
                min_height
            );
        }
        Self {
            min_width,
            min_height,
            max_width: self.max_width.max(min_width),
            max_height: self.max_height.max(min_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_constraints_are_repaired() {
        let constraints = ResizeConstraints {
            min_width: 0,
            min_height: 300,
            max_width: 100,
            max_height: 200,
        }
        .check_constraints();
        assert_eq!(
            constraints,
            ResizeConstraints {
                min_width: 1,
                min_height: 300,
                max_width: 100,
                max_height: 300,
            }
        );
    }

    #[test]
    fn descriptor_from_config() {
        let config = WindowConfig {
            title: "Blending".to_string(),
            width: 1024,
            height: 720,
            min_width: 320,
            min_height: 240,
            position: Some([10.0, 20.0]),
            mode: Mode::Fullscreen,
            resizable: false,
            cursor_locked: true,
        };
        let descriptor = WindowDescriptor::from(&config);
        assert_eq!(descriptor.title, "Blending");
        assert_eq!((descriptor.width, descriptor.height), (1024, 720));
        assert!(!descriptor.resizable);
        assert!(descriptor.cursor_locked);
        assert!(!descriptor.cursor_visible);
        assert_eq!(descriptor.mode, Mode::Fullscreen);
        assert_eq!(descriptor.position, Some([10.0, 20.0]));
        assert_eq!(
            descriptor.resize_constraints,
            ResizeConstraints {
                min_width: 320,
                min_height: 240,
                max_width: u32::MAX,
                max_height: u32::MAX,
            }
        );
    }
}
