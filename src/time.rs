//! Frame timing.
//!
//! [`Time`] is started when the viewer mounts and is never reset or paused;
//! its elapsed value drives the automatic orbit. The orbit controller only
//! depends on the [`ClockSource`] trait, so tests substitute a
//! [`ManualClock`].
//!
//! # Example
//!
//! ```ignore
//! use slopefield::time::{ClockSource, Time};
//!
//! let mut time = Time::new();
//!
//! // In your render loop:
//! time.update();
//!
//! log::debug!("elapsed {:.2}s, delta {:.4}s", time.elapsed(), time.delta());
//! ```

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic source of seconds elapsed since mount.
pub trait ClockSource {
    fn elapsed(&self) -> f64;
}

/// Frame clock for the render loop.
#[derive(Debug)]
pub struct Time {
    /// When the clock was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Advance one frame. Call once per redraw.
    ///
    /// Returns `true` when the FPS estimate was refreshed.
    pub fn update(&mut self) -> bool {
        let now = Instant::now();

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl ClockSource for Time {
    /// Seconds since the clock was created, read from the wall clock rather
    /// than the last `update`.
    fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Hand-driven clock for deterministic tests and headless use.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { now: Cell::new(start) }
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set(&self, secs: f64) {
        if secs >= self.now.get() {
            self.now.set(secs);
        }
    }

    pub fn advance(&self, secs: f64) {
        self.set(self.now.get() + secs.max(0.0));
    }
}

impl ClockSource for ManualClock {
    fn elapsed(&self) -> f64 {
        self.now.get()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    fn elapsed(&self) -> f64 {
        (**self).elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.delta(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        time.update();

        assert!(time.elapsed() > 0.0);
        assert!(time.delta() > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let time = Time::new();
        let a = time.elapsed();
        thread::sleep(Duration::from_millis(2));
        let b = time.elapsed();
        assert!(b > a);
    }

    #[test]
    fn test_fps_refresh() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(520));
        assert!(time.update());
        assert!(time.fps() > 0.0);
        assert!(!time.update());
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(1.0);
        clock.advance(0.5);
        assert_eq!(clock.elapsed(), 1.5);
        clock.set(0.0);
        assert_eq!(clock.elapsed(), 1.5);
        clock.advance(-3.0);
        assert_eq!(clock.elapsed(), 1.5);
    }
}
