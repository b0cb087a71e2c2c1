//! Vector-field equations sampled by the lattice builder.
//!
//! A field maps a lattice point `(x, y, z)` to the displacement `(dx, dy, dz)`
//! drawn as an arrow at that point. The viewer ships one field,
//! [`ReferenceField`], but any closure with the right shape works too:
//!
//! ```ignore
//! use slopefield::{lattice, IntegerInterval};
//! use glam::DVec3;
//!
//! let scene = lattice::build(
//!     IntegerInterval::new(-5, 5),
//!     1,
//!     &|x: f64, y: f64, _z: f64| DVec3::new(0.2, 0.2 * x / y, 0.0),
//! );
//! ```

use glam::DVec3;

/// A vector field sampled at integer lattice points.
pub trait VectorField {
    /// Displacement `(dx, dy, dz)` at the given point.
    ///
    /// Only called for points with no zero coordinate.
    fn slope(&self, x: f64, y: f64, z: f64) -> DVec3;

    /// Human readable form of the equations, one per line.
    ///
    /// An empty description suppresses the equation label.
    fn description(&self) -> String {
        String::new()
    }
}

impl<F> VectorField for F
where
    F: Fn(f64, f64, f64) -> DVec3,
{
    fn slope(&self, x: f64, y: f64, z: f64) -> DVec3 {
        self(x, y, z)
    }
}

/// `dy/dx = x / y`, `dz/dx = x / z`, stepped by a fixed `dx`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceField {
    /// Base displacement along X.
    pub dx: f64,
}

impl ReferenceField {
    /// Base displacement used by the viewer.
    pub const DEFAULT_DX: f64 = 0.2;

    pub fn new(dx: f64) -> Self {
        Self { dx }
    }
}

impl Default for ReferenceField {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DX)
    }
}

impl VectorField for ReferenceField {
    fn slope(&self, x: f64, y: f64, z: f64) -> DVec3 {
        let dx = self.dx;
        DVec3::new(dx, dx * (x / y), dx * (x / z))
    }

    fn description(&self) -> String {
        "dy/dx = x / y,\ndz/dx = x / z,\ndz/dy = y / z".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_slope() {
        let field = ReferenceField::default();
        let d = field.slope(2.0, 4.0, 5.0);
        assert_eq!(d.x, 0.2);
        assert!((d.y - 0.1).abs() < 1e-12);
        assert!((d.z - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_reference_description_has_three_lines() {
        let text = ReferenceField::default().description();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("dy/dx"));
    }

    #[test]
    fn test_closure_field() {
        let field = |x: f64, _y: f64, _z: f64| DVec3::new(x, 0.0, 0.0);
        assert_eq!(field.slope(3.0, 1.0, 1.0), DVec3::new(3.0, 0.0, 0.0));
        assert!(VectorField::description(&field).is_empty());
    }
}
