//! Interactive orbit controls.
//!
//! Left-drag rotates around the target, the wheel dollies in and out and
//! right- or middle-drag pans. Motion is applied immediately, without
//! damping.
//!
//! The controls keep no camera pose of their own. Every update re-derives
//! spherical coordinates from wherever the camera currently is, so taking
//! over from the automatic orbit never makes the view jump.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};

use crate::camera::CameraHandle;
use crate::input::{Input, MouseButton};

/// Keeps the polar angle away from the poles, where the view basis flips.
const POLAR_EPSILON: f32 = 1e-4;

/// Tuning for [`OrbitControls`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControlsConfig {
    /// Multiplier on a full turn per viewport height of drag.
    pub rotate_speed: f32,
    /// Dolly factor per wheel line is `0.95^zoom_speed`.
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitControlsConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 1.0,
            max_distance: 500.0,
        }
    }
}

/// Orbit manipulator fed from [`Input`].
#[derive(Debug)]
pub struct OrbitControls {
    config: OrbitControlsConfig,
    /// Pending azimuth change in radians.
    theta_delta: f32,
    /// Pending polar change in radians.
    phi_delta: f32,
    /// Pending distance multiplier.
    dolly: f32,
    /// Pending pan in viewport pixels.
    pan_pixels: Vec2,
    viewport_height: f32,
    /// Vertical field of view, for converting pan pixels to world units.
    fov_y: f32,
}

impl OrbitControls {
    pub fn new(config: OrbitControlsConfig, fov_y_degrees: f32) -> Self {
        Self {
            config,
            theta_delta: 0.0,
            phi_delta: 0.0,
            dolly: 1.0,
            pan_pixels: Vec2::ZERO,
            viewport_height: 720.0,
            fov_y: fov_y_degrees.to_radians(),
        }
    }

    /// Accumulate this frame's pointer input.
    pub fn handle_input(&mut self, input: &Input) {
        let (_, height) = input.window_size();
        self.viewport_height = height.max(1) as f32;

        let delta = input.mouse_delta();
        if input.mouse_held(MouseButton::Left) {
            let per_pixel = TAU / self.viewport_height * self.config.rotate_speed;
            self.theta_delta -= delta.x * per_pixel;
            self.phi_delta -= delta.y * per_pixel;
        } else if input.mouse_held(MouseButton::Right) || input.mouse_held(MouseButton::Middle) {
            self.pan_pixels += delta;
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            self.dolly *= 0.95_f32.powf(self.config.zoom_speed * scroll);
        }
    }

    /// Whether there is accumulated motion waiting to be applied.
    pub fn has_pending(&self) -> bool {
        self.theta_delta != 0.0
            || self.phi_delta != 0.0
            || self.dolly != 1.0
            || self.pan_pixels != Vec2::ZERO
    }

    /// Drop accumulated motion without touching any camera.
    pub fn discard(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.dolly = 1.0;
        self.pan_pixels = Vec2::ZERO;
    }

    /// Apply accumulated motion to `camera`.
    ///
    /// Returns `false`, leaving the camera untouched, when nothing moved.
    pub fn update(&mut self, camera: &mut impl CameraHandle) -> bool {
        if !self.has_pending() {
            return false;
        }

        let up = camera.up().try_normalize().unwrap_or(Vec3::Y);
        let to_y_up = Quat::from_rotation_arc(up, Vec3::Y);
        let from_y_up = to_y_up.inverse();

        let mut target = camera.target();
        let offset = to_y_up * (camera.position() - target);

        let mut radius = offset.length().max(f32::EPSILON);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.theta_delta;
        phi = (phi + self.phi_delta).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        radius = (radius * self.dolly).clamp(self.config.min_distance, self.config.max_distance);

        if self.pan_pixels != Vec2::ZERO {
            target += self.pan_offset(camera, up);
        }

        let offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );

        camera.set_position(target + from_y_up * offset);
        camera.look_at(target);
        self.discard();
        true
    }

    /// World-space shift of the target for the pending pan.
    ///
    /// One viewport height of drag moves the target by the height of the
    /// view frustum at the target distance.
    fn pan_offset(&self, camera: &impl CameraHandle, up: Vec3) -> Vec3 {
        let forward = (camera.target() - camera.position()).normalize_or_zero();
        let right = forward.cross(up).normalize_or_zero();
        let screen_up = right.cross(forward);

        let distance = camera.position().distance(camera.target());
        let world_per_pixel =
            2.0 * distance * (self.fov_y / 2.0).tan() / self.viewport_height * self.config.pan_speed;

        (-self.pan_pixels.x * right + self.pan_pixels.y * screen_up) * world_per_pixel
    }
}
