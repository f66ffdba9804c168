//! Perspective camera used for screen-space projection

use crate::foundation::math::{Mat4, Point3, Vec2, Vec3};
use nalgebra::{Isometry3, Perspective3};

/// Perspective camera with a pixel viewport
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Look-at target
    pub target: Vec3,
    /// Up direction
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(6.0, 4.0, 8.0),
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov_y_degrees: 35.0,
            near: 0.1,
            far: 100.0,
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Camera {
    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        let aspect = self.width / self.height;
        let projection = Perspective3::new(aspect, self.fov_y_degrees.to_radians(), self.near, self.far);
        let view = Isometry3::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        );
        projection.as_matrix() * view.to_homogeneous()
    }

    /// Project a world point to pixel coordinates (origin top-left)
    ///
    /// Returns `None` for points behind the camera.
    pub fn project(&self, point: &Point3) -> Option<Vec2> {
        let clip = self.view_projection() * point.to_homogeneous();
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some(Vec2::new(
            (ndc_x + 1.0) * 0.5 * self.width,
            (1.0 - ndc_y) * 0.5 * self.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_target_projects_to_viewport_center() {
        let camera = Camera::default();
        let screen = camera.project(&Point3::origin()).unwrap();
        assert_relative_eq!(screen.x, 640.0, epsilon = 1e-3);
        assert_relative_eq!(screen.y, 360.0, epsilon = 1e-3);
    }

    #[test]
    fn test_point_behind_camera_is_not_projected() {
        let camera = Camera::default();
        let behind = Point3::from(camera.position * 2.0);
        assert!(camera.project(&behind).is_none());
    }
}
