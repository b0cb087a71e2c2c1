//! Slope-field lattice generation.
//!
//! [`sample`] walks the integer lattice `[lo, hi]³` and evaluates a
//! [`VectorField`] at every point with no zero coordinate. [`build`] turns
//! those samples into arrows and adds the fixed decorations: axis labels,
//! the equation label and three families of grid lines.
//!
//! Both functions are pure. Calling them twice with the same arguments yields
//! equal output, element for element and in the same order.

use glam::{DVec3, IVec3};
use std::f64::consts::FRAC_PI_2;

use crate::field::VectorField;
use crate::scene::{Color, GridLine, Label, Orientation, OrientedPrimitive, Scene};

/// Thickness of a grid-line box.
const GRID_THICKNESS: f64 = 0.1;
/// How far beyond the lattice the equation label sits, as a multiple of `hi`.
const EQUATION_LABEL_DISTANCE: f64 = 5.0;
/// Scale of the equation label text.
const EQUATION_LABEL_SCALE: f64 = 20.0;

/// Inclusive integer range `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerInterval {
    pub lo: i32,
    pub hi: i32,
}

impl IntegerInterval {
    /// Create an interval. Bounds given in the wrong order are swapped.
    pub fn new(lo: i32, hi: i32) -> Self {
        Self {
            lo: lo.min(hi),
            hi: lo.max(hi),
        }
    }

    /// `[-half_extent, half_extent]`. The viewer samples `symmetric(10)`.
    pub fn symmetric(half_extent: i32) -> Self {
        Self::new(half_extent.saturating_neg(), half_extent)
    }

    pub fn contains(&self, v: i32) -> bool {
        (self.lo..=self.hi).contains(&v)
    }

    /// Number of integers in the interval.
    pub fn len(&self) -> usize {
        (self.hi as i64 - self.lo as i64) as usize + 1
    }

    /// Always false; an interval holds at least one integer.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Distance between the bounds.
    pub fn span(&self) -> f64 {
        self.hi as f64 - self.lo as f64
    }

    pub fn midpoint(&self) -> f64 {
        (self.lo as f64 + self.hi as f64) / 2.0
    }

    /// Values from `lo` to `hi` inclusive, `step` apart. Steps below 1 are
    /// treated as 1.
    pub fn iter(&self, step: i32) -> impl Iterator<Item = i32> + Clone {
        (self.lo..=self.hi).step_by(step.max(1) as usize)
    }
}

impl Default for IntegerInterval {
    fn default() -> Self {
        Self::symmetric(10)
    }
}

/// The field evaluated at one lattice point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    /// Lattice coordinates; no component is zero.
    pub position: IVec3,
    /// Field displacement `(dx, dy, dz)` at `position`.
    pub direction: DVec3,
    /// Euclidean norm of `direction`.
    pub length: f64,
}

impl FieldSample {
    pub fn new(position: IVec3, direction: DVec3) -> Self {
        Self {
            position,
            direction,
            length: direction.length(),
        }
    }

    /// Pitch and yaw that tilt the arrow towards `direction`.
    ///
    /// `pitch = atan2(dz, √(dx² + dy²))`, `yaw = atan2(dy, dx)`, no roll.
    pub fn orientation(&self) -> Orientation {
        let DVec3 { x: dx, y: dy, z: dz } = self.direction;
        Orientation::new(dz.atan2((dx * dx + dy * dy).sqrt()), dy.atan2(dx), 0.0)
    }

    pub fn to_primitive(&self) -> OrientedPrimitive {
        OrientedPrimitive {
            anchor: self.position.as_dvec3(),
            orientation: self.orientation(),
            length: self.length,
            color: Color::BLACK,
        }
    }
}

/// Evaluate `field` over the lattice, skipping points with a zero coordinate.
///
/// Points are visited x-major, then y, then z.
pub fn sample<F>(range: IntegerInterval, step: i32, field: &F) -> Vec<FieldSample>
where
    F: VectorField + ?Sized,
{
    let axis = range.iter(step);
    let mut samples = Vec::new();

    for x in axis.clone() {
        for y in axis.clone() {
            for z in axis.clone() {
                if x == 0 || y == 0 || z == 0 {
                    continue;
                }
                let direction = field.slope(x as f64, y as f64, z as f64);
                samples.push(FieldSample::new(IVec3::new(x, y, z), direction));
            }
        }
    }

    samples
}

/// Build the complete scene for `field` over `range`.
pub fn build<F>(range: IntegerInterval, step: i32, field: &F) -> Scene
where
    F: VectorField + ?Sized,
{
    let arrows: Vec<OrientedPrimitive> = sample(range, step, field)
        .iter()
        .map(FieldSample::to_primitive)
        .collect();

    let mut labels = axis_labels(range);
    if let Some(label) = equation_label(range, &field.description()) {
        labels.push(label);
    }

    log::debug!(
        "built lattice over [{}, {}] step {}: {} arrows",
        range.lo,
        range.hi,
        step.max(1),
        arrows.len()
    );

    Scene {
        arrows,
        labels,
        grid_lines: grid_lines(range),
    }
}

/// `X`, `Y` and `Z` one unit past the upper bound of each axis.
fn axis_labels(range: IntegerInterval) -> Vec<Label> {
    let at = range.hi as f64 + 1.0;
    let label = |text: &str, position: DVec3, rotation: Orientation| Label {
        text: text.to_string(),
        position,
        rotation,
        scale: 1.0,
        color: Color::BLACK,
    };

    vec![
        label("X", DVec3::new(at, 0.0, 0.0), Orientation::new(0.0, FRAC_PI_2, 0.0)),
        label("Y", DVec3::new(0.0, at, 0.0), Orientation::new(0.0, 0.0, FRAC_PI_2)),
        label("Z", DVec3::new(0.0, 0.0, at), Orientation::new(FRAC_PI_2, 0.0, 0.0)),
    ]
}

fn equation_label(range: IntegerInterval, text: &str) -> Option<Label> {
    if text.trim().is_empty() {
        return None;
    }
    let d = range.hi as f64 * EQUATION_LABEL_DISTANCE;
    Some(Label {
        text: text.to_string(),
        position: DVec3::new(d, d, -d),
        rotation: Orientation::new(FRAC_PI_2, 0.0, 0.0),
        scale: EQUATION_LABEL_SCALE,
        color: Color::BLACK,
    })
}

/// One box per integer in the range for each axis.
///
/// The X family sits at `(i, 0, 0)` and runs along Y, the Y family at
/// `(0, i, 0)` runs along X, and the Z family at `(0, 0, i)` runs along Z.
fn grid_lines(range: IntegerInterval) -> Vec<GridLine> {
    let span = range.span();
    let mid = range.midpoint();
    let t = GRID_THICKNESS;
    let mut lines = Vec::with_capacity(range.len() * 3);

    for i in range.lo..=range.hi {
        lines.push(GridLine {
            center: DVec3::new(i as f64, mid, 0.0),
            size: DVec3::new(t, span, t),
            color: Color::GRID_GREY,
        });
    }
    for i in range.lo..=range.hi {
        lines.push(GridLine {
            center: DVec3::new(mid, i as f64, 0.0),
            size: DVec3::new(span, t, t),
            color: Color::GRID_GREY,
        });
    }
    for i in range.lo..=range.hi {
        lines.push(GridLine {
            center: DVec3::new(0.0, 0.0, i as f64),
            size: DVec3::new(t, t, span),
            color: Color::AXIS_BLUE,
        });
    }

    lines
}
