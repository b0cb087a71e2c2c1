//! Primitive descriptors handed to the renderer.
//!
//! A [`Scene`] is built once by [`crate::lattice::build`] and never mutated
//! afterwards. The renderer uploads it at startup; nothing in the frame loop
//! touches it again.

use glam::{DQuat, DVec3, EulerRot};

use crate::glyphs;

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Arrow and label ink.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    /// X and Y grid lines, `#cccccc`.
    pub const GRID_GREY: Color = Color::new(0.8, 0.8, 0.8);
    /// Z grid lines, `#0000ff`.
    pub const AXIS_BLUE: Color = Color::new(0.0, 0.0, 1.0);
    /// Clear colour applied every frame, `#f0f0f0`.
    pub const BACKGROUND: Color = Color::new(0.941_176_5, 0.941_176_5, 0.941_176_5);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Euler angles applied in X, Y, Z order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Rotation about X.
    pub pitch: f64,
    /// Rotation about Y.
    pub yaw: f64,
    /// Rotation about Z.
    pub roll: f64,
}

impl Orientation {
    pub const fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn to_quat(self) -> DQuat {
        DQuat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, self.roll)
    }
}

/// A renderable arrow.
///
/// The arrow mesh runs along its local +Y axis with unit height; `length`
/// stretches it along that axis before `orientation` is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedPrimitive {
    pub anchor: DVec3,
    pub orientation: Orientation,
    pub length: f64,
    pub color: Color,
}

/// Text drawn in world space, centred on `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: DVec3,
    pub rotation: Orientation,
    pub scale: f64,
    pub color: Color,
}

impl Label {
    /// World-space stroke segments of the label text.
    pub fn segments(&self) -> Vec<(DVec3, DVec3)> {
        let rotation = self.rotation.to_quat();
        let place = |p: glam::DVec2| self.position + rotation * (DVec3::new(p.x, p.y, 0.0) * self.scale);

        glyphs::layout(&self.text)
            .into_iter()
            .map(|(a, b)| (place(a), place(b)))
            .collect()
    }
}

/// An axis-aligned box used as a grid line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub center: DVec3,
    pub size: DVec3,
    pub color: Color,
}

/// Everything the renderer draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub arrows: Vec<OrientedPrimitive>,
    pub labels: Vec<Label>,
    pub grid_lines: Vec<GridLine>,
}

impl Scene {
    /// Total number of primitives of every kind.
    pub fn primitive_count(&self) -> usize {
        self.arrows.len() + self.labels.len() + self.grid_lines.len()
    }
}
