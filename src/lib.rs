//! # slopefield - 3D slope field viewer
//!
//! Samples a vector field on an integer lattice, draws an arrow at every
//! point, and slowly orbits the camera around the origin until the user
//! clicks, at which point interactive orbit controls take over for good.
//!
//! ## Quick Start
//!
//! ```ignore
//! use slopefield::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     SlopeField::new()
//!         .with_range(IntegerInterval::symmetric(10))
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Fields and the lattice
//!
//! A [`VectorField`] maps `(x, y, z)` to a displacement. [`lattice::build`]
//! evaluates it at every lattice point with no zero coordinate and turns
//! each result into an [`OrientedPrimitive`], then adds axis labels, the
//! equation label and grid lines. The resulting [`Scene`] is immutable.
//!
//! ### Control modes
//!
//! The camera starts in [`ControlMode::Auto`], driven by
//! [`CameraOrbitController`] as a pure function of elapsed time. The first
//! primary-button press flips the shared [`InputModeLatch`] to
//! [`ControlMode::Manual`]; there is no way back.
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `egui` | Instructions drawer overlay |

pub mod app;
pub mod camera;
pub mod control;
pub mod controls;
pub mod error;
pub mod field;
pub mod glyphs;
pub mod gpu;
pub mod input;
pub mod lattice;
pub mod orbit;
pub mod scene;
pub mod time;
#[cfg(feature = "egui")]
pub mod ui;

pub use app::SlopeField;
pub use camera::{CameraHandle, CameraState, Projection};
pub use control::{ControlMode, InputModeLatch};
pub use controls::{OrbitControls, OrbitControlsConfig};
pub use error::{AppError, GpuError};
pub use field::{ReferenceField, VectorField};
pub use glam::{DVec3, IVec3, Vec3};
pub use lattice::{FieldSample, IntegerInterval};
pub use orbit::{Backdrop, CameraOrbitController, OrbitParams};
pub use scene::{Color, GridLine, Label, Orientation, OrientedPrimitive, Scene};
pub use time::{ClockSource, ManualClock, Time};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use slopefield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::SlopeField;
    pub use crate::camera::{CameraHandle, CameraState, Projection};
    pub use crate::control::{ControlMode, InputModeLatch};
    pub use crate::controls::OrbitControlsConfig;
    pub use crate::error::AppError;
    pub use crate::field::{ReferenceField, VectorField};
    pub use crate::lattice::IntegerInterval;
    pub use crate::orbit::OrbitParams;
    pub use crate::scene::{Color, Scene};
    pub use crate::{DVec3, Vec3};
}
