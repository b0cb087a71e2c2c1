//! Automatic camera orbit.
//!
//! Until the user claims the camera, [`CameraOrbitController`] moves it along
//! a circle of fixed radius in the XZ plane, always looking at the origin:
//!
//! ```text
//! phase    = elapsed * angular_speed
//! position = (radius * cos(phase), 0, radius * sin(phase))
//! ```
//!
//! The camera is a pure function of the clock while the latch reads
//! [`ControlMode::Auto`]. Once it reads [`ControlMode::Manual`] the
//! controller never writes the camera again, and the only way to reach it is
//! [`CameraOrbitController::manual_camera`].

use std::sync::Arc;

use glam::Vec3;

use crate::camera::CameraHandle;
use crate::control::{ControlMode, InputModeLatch};
use crate::scene::Color;
use crate::time::ClockSource;

/// Something with a clear colour, i.e. the renderer.
pub trait Backdrop {
    fn set_clear_color(&mut self, color: Color);
}

/// Radius and speed of the automatic orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Distance from the origin.
    pub radius: f32,
    /// Radians per second.
    pub angular_speed: f64,
}

impl OrbitParams {
    pub const DEFAULT_RADIUS: f32 = 30.0;
    pub const DEFAULT_ANGULAR_SPEED: f64 = 0.1;

    /// Camera position at `elapsed` seconds.
    pub fn position_at(&self, elapsed: f64) -> Vec3 {
        let phase = elapsed * self.angular_speed;
        let r = self.radius as f64;
        Vec3::new((r * phase.cos()) as f32, 0.0, (r * phase.sin()) as f32)
    }

    /// Pose set once at mount, where the orbit starts.
    pub fn start_position(&self) -> Vec3 {
        Vec3::new(self.radius, 0.0, 0.0)
    }
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            angular_speed: Self::DEFAULT_ANGULAR_SPEED,
        }
    }
}

/// Drives the camera around the origin until the latch flips.
pub struct CameraOrbitController<H, C> {
    camera: H,
    clock: C,
    latch: Arc<InputModeLatch>,
    params: OrbitParams,
    background: Color,
}

impl<H: CameraHandle, C: ClockSource> CameraOrbitController<H, C> {
    pub fn new(camera: H, clock: C, latch: Arc<InputModeLatch>, params: OrbitParams) -> Self {
        Self {
            camera,
            clock,
            latch,
            params,
            background: Color::BACKGROUND,
        }
    }

    /// Override the clear colour applied every frame.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the fixed starting pose. Call once before the first frame.
    pub fn mount(&mut self) {
        self.camera.set_position(self.params.start_position());
        self.camera.set_up(Vec3::Y);
        self.camera.look_at(Vec3::ZERO);
    }

    /// Per-frame update.
    ///
    /// Sets the clear colour, then moves the camera along the orbit if and
    /// only if control is still automatic.
    pub fn on_frame(&mut self, backdrop: &mut impl Backdrop) -> ControlMode {
        backdrop.set_clear_color(self.background);

        let mode = self.latch.current_mode();
        if mode == ControlMode::Manual {
            return mode;
        }

        let position = self.params.position_at(self.clock.elapsed());
        self.camera.set_position(position);
        self.camera.look_at(Vec3::ZERO);
        mode
    }

    /// The camera, writable only after the user has claimed it.
    pub fn manual_camera(&mut self) -> Option<&mut H> {
        if self.latch.current_mode().is_manual() {
            Some(&mut self.camera)
        } else {
            None
        }
    }

    pub fn camera(&self) -> &H {
        &self.camera
    }

    /// The injected clock, e.g. to advance frame statistics.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn mode(&self) -> ControlMode {
        self.latch.current_mode()
    }

    pub fn params(&self) -> OrbitParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraState;
    use crate::time::ManualClock;
    use rand::Rng;
    use std::f64::consts::TAU;

    /// Camera that counts every write.
    #[derive(Default)]
    struct SpyCamera {
        state: CameraState,
        writes: usize,
    }

    impl CameraHandle for SpyCamera {
        fn position(&self) -> Vec3 {
            self.state.position
        }
        fn up(&self) -> Vec3 {
            self.state.up
        }
        fn target(&self) -> Vec3 {
            self.state.target
        }
        fn set_position(&mut self, position: Vec3) {
            self.writes += 1;
            self.state.position = position;
        }
        fn set_up(&mut self, up: Vec3) {
            self.writes += 1;
            self.state.up = up;
        }
        fn look_at(&mut self, target: Vec3) {
            self.writes += 1;
            self.state.target = target;
        }
    }

    #[derive(Default)]
    struct SpyBackdrop {
        sets: usize,
        last: Option<Color>,
    }

    impl Backdrop for SpyBackdrop {
        fn set_clear_color(&mut self, color: Color) {
            self.sets += 1;
            self.last = Some(color);
        }
    }

    fn controller(
        clock: &ManualClock,
    ) -> (CameraOrbitController<SpyCamera, &ManualClock>, Arc<InputModeLatch>) {
        let latch = Arc::new(InputModeLatch::new());
        let mut ctl = CameraOrbitController::new(
            SpyCamera::default(),
            clock,
            Arc::clone(&latch),
            OrbitParams::default(),
        );
        ctl.mount();
        (ctl, latch)
    }

    #[test]
    fn test_mount_sets_start_pose() {
        let clock = ManualClock::new(0.0);
        let (ctl, _) = controller(&clock);
        assert_eq!(ctl.camera().position(), Vec3::new(30.0, 0.0, 0.0));
        assert_eq!(ctl.camera().up(), Vec3::Y);
        assert_eq!(ctl.camera().target(), Vec3::ZERO);
    }

    #[test]
    fn test_first_frame_continues_from_start_pose() {
        let clock = ManualClock::new(0.0);
        let (mut ctl, _) = controller(&clock);
        let start = ctl.camera().position();
        ctl.on_frame(&mut SpyBackdrop::default());
        assert!((ctl.camera().position() - start).length() < 1e-5);
    }

    #[test]
    fn test_orbit_stays_on_circle() {
        let clock = ManualClock::new(0.0);
        let (mut ctl, _) = controller(&clock);
        let mut backdrop = SpyBackdrop::default();
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            clock.advance(rng.gen_range(0.0..5.0));
            ctl.on_frame(&mut backdrop);
            let p = ctl.camera().position();
            assert!((p.length() - 30.0).abs() < 1e-3);
            assert_eq!(p.y, 0.0);
            assert_eq!(ctl.camera().target(), Vec3::ZERO);
        }
    }

    #[test]
    fn test_orbit_moves_between_frames() {
        let clock = ManualClock::new(1.0);
        let (mut ctl, _) = controller(&clock);
        let mut backdrop = SpyBackdrop::default();

        ctl.on_frame(&mut backdrop);
        let p1 = ctl.camera().position();
        clock.advance(0.016);
        ctl.on_frame(&mut backdrop);
        let p2 = ctl.camera().position();
        assert_ne!(p1, p2);

        // A full turn later the camera is back where it was
        let period = TAU / OrbitParams::DEFAULT_ANGULAR_SPEED;
        clock.advance(period);
        ctl.on_frame(&mut backdrop);
        assert!((ctl.camera().position() - p2).length() < 1e-3);
    }

    #[test]
    fn test_position_is_pure_function_of_clock() {
        let params = OrbitParams::default();
        let quarter = std::f64::consts::FRAC_PI_2 / params.angular_speed;
        let p = params.position_at(quarter);
        assert!(p.x.abs() < 1e-4);
        assert!((p.z - 30.0).abs() < 1e-4);
        assert_eq!(params.position_at(12.5), params.position_at(12.5));
    }

    #[test]
    fn test_frozen_after_click() {
        let clock = ManualClock::new(0.0);
        let (mut ctl, latch) = controller(&clock);
        let mut backdrop = SpyBackdrop::default();

        clock.advance(1.0);
        ctl.on_frame(&mut backdrop);
        assert_eq!(ctl.mode(), ControlMode::Auto);

        latch.on_primary_pointer_down();
        let writes = ctl.camera().writes;
        let frozen = ctl.camera().state;

        for _ in 0..50 {
            clock.advance(0.5);
            assert_eq!(ctl.on_frame(&mut backdrop), ControlMode::Manual);
        }
        assert_eq!(ctl.camera().writes, writes);
        assert_eq!(ctl.camera().state, frozen);
    }

    #[test]
    fn test_manual_camera_only_after_click() {
        let clock = ManualClock::new(0.0);
        let (mut ctl, latch) = controller(&clock);
        assert!(ctl.manual_camera().is_none());

        latch.on_primary_pointer_down();
        let cam = ctl.manual_camera().expect("camera handed over");
        cam.set_position(Vec3::new(1.0, 2.0, 3.0));
        ctl.on_frame(&mut SpyBackdrop::default());
        assert_eq!(ctl.camera().position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_clear_color_every_frame_in_both_modes() {
        let clock = ManualClock::new(0.0);
        let (mut ctl, latch) = controller(&clock);
        let mut backdrop = SpyBackdrop::default();

        ctl.on_frame(&mut backdrop);
        latch.on_primary_pointer_down();
        ctl.on_frame(&mut backdrop);
        ctl.on_frame(&mut backdrop);

        assert_eq!(backdrop.sets, 3);
        assert_eq!(backdrop.last, Some(Color::BACKGROUND));
    }
}
