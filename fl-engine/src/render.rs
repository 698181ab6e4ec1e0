use glam::Mat4;

use crate::config::ProjectionConfig;

pub mod window;

#[derive(Copy, Clone, Debug, PartialEq)]
/// Perspective projection for a viewport, fed with the camera field of view each frame.
pub struct Projection {
    width: u32,
    height: u32,
    near: f32,
    far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(800, 600, &ProjectionConfig::default())
    }
}

impl Projection {
    #[must_use]
    pub const fn new(width: u32, height: u32, config: &ProjectionConfig) -> Self {
        Self {
            width,
            height,
            near: config.near,
            far: config.far,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::trace!("Projection resized to {width}x{height}");
        self.width = width;
        self.height = height;
    }

    /// A minimized window reports a zero size, which is treated as one pixel.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Right-handed projection with an OpenGL `[-1, 1]` depth range.
    #[must_use]
    pub fn matrix(&self, fov_degrees: f32) -> Mat4 {
        Mat4::perspective_rh_gl(fov_degrees.to_radians(), self.aspect(), self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::{Vec3, Vec4};

    use super::*;

    #[test]
    fn aspect_follows_resize() {
        let mut projection = Projection::default();
        assert_abs_diff_eq!(projection.aspect(), 800.0 / 600.0);
        projection.resize(1024, 512);
        assert_abs_diff_eq!(projection.aspect(), 2.0);
        projection.resize(1024, 0);
        assert_abs_diff_eq!(projection.aspect(), 1024.0);
    }

    #[test]
    fn near_and_far_planes_map_to_depth_range() {
        let projection = Projection::default();
        let matrix = projection.matrix(45.0);

        let near = matrix * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert_abs_diff_eq!(near.z / near.w, -1.0, epsilon = 1e-4);

        let far = matrix.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn narrower_fov_magnifies() {
        let projection = Projection::default();
        let point = Vec3::new(1.0, 1.0, -10.0);
        let wide = projection.matrix(45.0).project_point3(point);
        let narrow = projection.matrix(20.0).project_point3(point);
        assert!(narrow.y > wide.y);
    }
}
