//! Stroke outlines for label text.
//!
//! Labels are drawn as line segments rather than rasterised glyphs, so the
//! font only needs to cover the characters the scene actually prints: the
//! axis names and the field equations. Coordinates are in em units with the
//! baseline at `y = 0` and a cap height of `0.7`.

use glam::DVec2;

/// Horizontal pen advance per character.
pub const ADVANCE: f64 = 0.6;
/// Distance between consecutive baselines.
pub const LINE_HEIGHT: f64 = 1.2;
/// Depth below the baseline reserved for descenders.
const DESCENT: f64 = 0.3;
/// Width of a glyph's ink box (advance minus letter spacing).
const GLYPH_WIDTH: f64 = 0.5;

/// Line segments of a single glyph as `[x0, y0, x1, y1]`.
fn strokes(c: char) -> &'static [[f64; 4]] {
    match c {
        'X' => &[[0.0, 0.0, 0.5, 0.7], [0.0, 0.7, 0.5, 0.0]],
        'Y' => &[
            [0.0, 0.7, 0.25, 0.35],
            [0.5, 0.7, 0.25, 0.35],
            [0.25, 0.35, 0.25, 0.0],
        ],
        'Z' => &[[0.0, 0.7, 0.5, 0.7], [0.5, 0.7, 0.0, 0.0], [0.0, 0.0, 0.5, 0.0]],
        'x' => &[[0.05, 0.0, 0.45, 0.5], [0.05, 0.5, 0.45, 0.0]],
        'y' => &[[0.05, 0.5, 0.25, 0.0], [0.45, 0.5, 0.15, -0.25]],
        'z' => &[[0.05, 0.5, 0.45, 0.5], [0.45, 0.5, 0.05, 0.0], [0.05, 0.0, 0.45, 0.0]],
        'd' => &[
            [0.45, 0.75, 0.45, 0.0],
            [0.45, 0.4, 0.3, 0.5],
            [0.3, 0.5, 0.1, 0.45],
            [0.1, 0.45, 0.05, 0.25],
            [0.05, 0.25, 0.1, 0.05],
            [0.1, 0.05, 0.3, 0.0],
            [0.3, 0.0, 0.45, 0.1],
        ],
        '/' => &[[0.05, -0.1, 0.45, 0.8]],
        '=' => &[[0.05, 0.2, 0.45, 0.2], [0.05, 0.4, 0.45, 0.4]],
        ',' => &[[0.2, 0.05, 0.1, -0.15]],
        _ => &[],
    }
}

/// Whether the font has an outline for `c`. Space counts as covered.
pub fn is_covered(c: char) -> bool {
    c == ' ' || !strokes(c).is_empty()
}

/// Lay out `text` as segments centred on the origin.
///
/// Lines are left-aligned inside a block whose bounding box is centred on
/// `(0, 0)`. Characters without an outline advance the pen but draw nothing.
pub fn layout(text: &str) -> Vec<(DVec2, DVec2)> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = if widest == 0 {
        0.0
    } else {
        (widest - 1) as f64 * ADVANCE + GLYPH_WIDTH
    };
    let height = lines.len() as f64 * LINE_HEIGHT;
    let origin = DVec2::new(-width / 2.0, height / 2.0);

    let mut segments = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let baseline = origin.y - (row + 1) as f64 * LINE_HEIGHT + DESCENT;
        for (col, c) in line.chars().enumerate() {
            let pen = DVec2::new(origin.x + col as f64 * ADVANCE, baseline);
            for s in strokes(c) {
                segments.push((pen + DVec2::new(s[0], s[1]), pen + DVec2::new(s[2], s[3])));
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_letters() {
        assert_eq!(layout("X").len(), 2);
        assert_eq!(layout("Y").len(), 3);
        assert_eq!(layout("Z").len(), 3);
    }

    #[test]
    fn test_single_glyph_is_centred() {
        let segs = layout("X");
        let (min, max) = segs.iter().fold(
            (DVec2::splat(f64::MAX), DVec2::splat(f64::MIN)),
            |(lo, hi), (a, b)| (lo.min(*a).min(*b), hi.max(*a).max(*b)),
        );
        assert!((min.x + max.x).abs() < 1e-9);
        assert!((max.x - min.x - GLYPH_WIDTH).abs() < 1e-9);
    }

    #[test]
    fn test_equation_text_is_covered() {
        let text = "dy/dx = x / y,\ndz/dx = x / z,\ndz/dy = y / z";
        assert!(text.chars().filter(|c| *c != '\n').all(is_covered));
        assert!(!layout(text).is_empty());
    }

    #[test]
    fn test_lines_stack_downwards() {
        let one = layout("X");
        let two = layout("X\nX");
        assert_eq!(two.len(), 2 * one.len());
        assert!(two[0].0.y > two[2].0.y);
    }

    #[test]
    fn test_unknown_and_empty() {
        assert!(layout("").is_empty());
        assert!(layout("?").is_empty());
        assert!(!is_covered('?'));
    }
}
