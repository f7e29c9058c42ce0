//! Shape drawing
//!
//! Every primitive is drawn centered on the local origin; the caller has
//! already translated to the cell center and rotated.

use cipherfeed_core::{Color, Shape};
use glam::DVec2;

use crate::surface::Surface;

/// A concrete shape for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Circle,
    Square,
    Triangle,
}

impl Primitive {
    /// Resolve the encoding's shape for a grid cell.
    ///
    /// `Mixed` cycles by anti-diagonal: `(row + col) mod 3`.
    pub fn for_cell(shape: Shape, row: usize, col: usize) -> Self {
        match shape {
            Shape::Circle => Self::Circle,
            Shape::Square => Self::Square,
            Shape::Triangle => Self::Triangle,
            Shape::Mixed => match (row + col) % 3 {
                0 => Self::Circle,
                1 => Self::Square,
                _ => Self::Triangle,
            },
        }
    }

    /// Draw at the local origin with bounding size `size`
    pub fn draw<S: Surface + ?Sized>(self, surface: &mut S, size: f64, color: Color) {
        let half = size / 2.0;
        match self {
            Self::Circle => surface.fill_circle(0.0, 0.0, half, color),
            Self::Square => surface.fill_rect(-half, -half, size, size, color),
            Self::Triangle => surface.fill_polygon(&triangle_points(size), color),
        }
    }
}

/// Apex-up isosceles triangle inscribed in a `size × size` box
pub fn triangle_points(size: f64) -> [DVec2; 3] {
    let half = size / 2.0;
    [
        DVec2::new(0.0, -half),
        DVec2::new(-half, half),
        DVec2::new(half, half),
    ]
}
