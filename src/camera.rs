//! Camera state and the capability the controllers write through.

use glam::{Mat4, Vec3};

/// Write access to a camera, as handed to the orbit controller and the
/// interactive orbit controls.
pub trait CameraHandle {
    fn position(&self) -> Vec3;
    fn up(&self) -> Vec3;
    fn target(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn set_up(&mut self, up: Vec3);
    /// Point the camera at `target`.
    fn look_at(&mut self, target: Vec3);
}

/// Perspective camera looking at a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub up: Vec3,
    pub target: Vec3,
}

impl CameraState {
    pub fn new(position: Vec3, up: Vec3, target: Vec3) -> Self {
        Self { position, up, target }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_proj(&self, projection: &Projection, aspect: f32) -> Mat4 {
        projection.matrix(aspect) * self.view_matrix()
    }

    /// Distance from the camera to its target.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            up: Vec3::Y,
            target: Vec3::ZERO,
        }
    }
}

impl CameraHandle for CameraState {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn up(&self) -> Vec3 {
        self.up
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    #[test]
    fn test_handle_setters() {
        let mut cam = CameraState::default();
        cam.set_position(Vec3::new(30.0, 0.0, 0.0));
        cam.set_up(Vec3::Y);
        cam.look_at(Vec3::ZERO);
        assert_eq!(cam.position(), Vec3::new(30.0, 0.0, 0.0));
        assert_eq!(cam.distance(), 30.0);
    }

    #[test]
    fn test_target_projects_to_screen_centre() {
        let cam = CameraState::new(Vec3::new(30.0, 0.0, 0.0), Vec3::Y, Vec3::ZERO);
        let clip = cam.view_proj(&Projection::default(), 16.0 / 9.0) * Vec3::ZERO.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_up_points_up_on_screen() {
        let cam = CameraState::new(Vec3::new(30.0, 0.0, 0.0), Vec3::Y, Vec3::ZERO);
        let clip = cam.view_proj(&Projection::default(), 1.0) * Vec3::new(0.0, 5.0, 0.0).extend(1.0);
        assert!(clip.y / clip.w > 0.0);
    }
}
