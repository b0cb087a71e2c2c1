//! Who drives the camera: the automatic orbit or the user.
//!
//! Control starts in [`ControlMode::Auto`]. The first primary pointer press
//! on the viewport hands it to the user for the rest of the session; there
//! is no way back.

use std::sync::atomic::{AtomicBool, Ordering};

/// Camera control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// The orbit controller moves the camera every frame.
    #[default]
    Auto,
    /// The interactive orbit controls own the camera.
    Manual,
}

impl ControlMode {
    pub fn is_manual(self) -> bool {
        matches!(self, ControlMode::Manual)
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlMode::Auto => "auto-rotate",
            ControlMode::Manual => "manual",
        }
    }
}

/// One-shot `Auto → Manual` switch.
///
/// The pointer handler is the only writer and the frame loop the only
/// reader. The flag is atomic, so the latch can be shared through an
/// `Arc` even when those run on different threads.
#[derive(Debug, Default)]
pub struct InputModeLatch {
    manual: AtomicBool,
}

impl InputModeLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a primary pointer press.
    ///
    /// The first call switches to [`ControlMode::Manual`]; later calls do
    /// nothing.
    pub fn on_primary_pointer_down(&self) {
        if !self.manual.swap(true, Ordering::AcqRel) {
            log::info!("camera control handed to the user");
        }
    }

    pub fn current_mode(&self) -> ControlMode {
        if self.manual.load(Ordering::Acquire) {
            ControlMode::Manual
        } else {
            ControlMode::Auto
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_auto() {
        let latch = InputModeLatch::new();
        assert_eq!(latch.current_mode(), ControlMode::Auto);
        assert!(!latch.current_mode().is_manual());
    }

    #[test]
    fn test_first_press_switches_to_manual() {
        let latch = InputModeLatch::new();
        latch.on_primary_pointer_down();
        assert_eq!(latch.current_mode(), ControlMode::Manual);
    }

    #[test]
    fn test_repeated_presses_are_harmless() {
        let latch = InputModeLatch::new();
        for _ in 0..100 {
            latch.on_primary_pointer_down();
            assert_eq!(latch.current_mode(), ControlMode::Manual);
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let latch = Arc::new(InputModeLatch::new());
        let writer = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || latch.on_primary_pointer_down())
        };
        writer.join().unwrap();
        assert_eq!(latch.current_mode(), ControlMode::Manual);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ControlMode::Auto.name(), "auto-rotate");
        assert_eq!(ControlMode::Manual.name(), "manual");
    }
}
