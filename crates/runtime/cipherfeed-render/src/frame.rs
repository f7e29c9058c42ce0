//! Frame rendering - grid layout, symmetry folding, per-cell animation
//!
//! All per-cell values derive from one scalar, the phase:
//!
//! ```text
//! phase    = (frame · speed · 0.01) mod 2π
//! size     = base · (1 + 0.3 · sin(phase + (row+col)·0.5))      ∈ [0.7, 1.3]·base
//! color    = ⌊((row+col + 10·phase) mod 2n) / 2⌋ mod n
//! alpha    = 0.7 + 0.2 · sin(phase + row + col)                 ∈ [0.5, 0.9]
//! rotation = 0.5 · phase + 0.1 · (row+col)
//! ```
//!
//! Folding moves where a cell is drawn, never which color or shape it
//! gets: those always read the unfolded `row, col`.

use std::f64::consts::TAU;

use cipherfeed_core::{Color, Shape, VisualEncoding};
use glam::DVec2;

use crate::shape::Primitive;
use crate::surface::Surface;

/// Cells per side
pub const GRID_SIZE: usize = 8;

/// Frame background
pub const BACKGROUND: Color = Color::from_u32(0x0A0A0A);

/// Phase advance per frame per unit of movement speed
const PHASE_RATE: f64 = 0.01;

/// Base shape size as a fraction of the smaller cell side
const BASE_SIZE_RATIO: f64 = 0.3;

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderParams<'a> {
    pub encoding: &'a VisualEncoding,
    pub frame_index: u64,
}

impl<'a> RenderParams<'a> {
    pub fn new(encoding: &'a VisualEncoding, frame_index: u64) -> Self {
        Self {
            encoding,
            frame_index,
        }
    }
}

/// Animation phase in `[0, 2π)`
pub fn phase(frame_index: u64, movement_speed: f64) -> f64 {
    (frame_index as f64 * movement_speed * PHASE_RATE) % TAU
}

/// Draw position for a cell under the given symmetry level.
///
/// Level 2 mirrors the right half onto the left, level 3 and up also
/// mirrors the bottom half onto the top. Levels 0 and 1 leave cells in
/// place.
pub fn fold(row: usize, col: usize, symmetry_level: u8) -> (usize, usize) {
    let half = GRID_SIZE / 2;
    let folding = symmetry_level >= 1;

    let mirrored_col = if symmetry_level >= 2 { GRID_SIZE - 1 - col } else { col };
    let mirrored_row = if symmetry_level >= 3 { GRID_SIZE - 1 - row } else { row };

    let final_row = if folding && row >= half { mirrored_row } else { row };
    let final_col = if folding && col >= half { mirrored_col } else { col };
    (final_row, final_col)
}

/// Resolved draw parameters for one grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParams {
    pub row: usize,
    pub col: usize,
    pub final_row: usize,
    pub final_col: usize,
    /// Draw center in surface pixels
    pub center: DVec2,
    pub size: f64,
    pub color_index: usize,
    pub alpha: f64,
    pub rotation: f64,
    pub primitive: Primitive,
}

/// Per-frame constants shared by all 64 cells
#[derive(Debug, Clone, Copy)]
pub struct FrameLayout {
    pub cell_width: f64,
    pub cell_height: f64,
    pub base_size: f64,
    pub phase: f64,
    palette_len: usize,
    shape: Shape,
    symmetry_level: u8,
}

impl FrameLayout {
    /// `None` for a zero-sized surface or an empty palette
    pub fn new(encoding: &VisualEncoding, frame_index: u64, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || encoding.color_palette.is_empty() {
            return None;
        }

        let cell_width = f64::from(width) / GRID_SIZE as f64;
        let cell_height = f64::from(height) / GRID_SIZE as f64;

        Some(Self {
            cell_width,
            cell_height,
            base_size: cell_width.min(cell_height) * BASE_SIZE_RATIO,
            phase: phase(frame_index, encoding.movement_speed),
            palette_len: encoding.color_palette.len(),
            shape: encoding.shape,
            symmetry_level: encoding.symmetry_level,
        })
    }

    /// Parameters for the cell at `(row, col)`
    pub fn cell(&self, row: usize, col: usize) -> CellParams {
        let (final_row, final_col) = fold(row, col, self.symmetry_level);
        let diagonal = (row + col) as f64;
        let phase = self.phase;

        let center = DVec2::new(
            final_col as f64 * self.cell_width + self.cell_width / 2.0,
            final_row as f64 * self.cell_height + self.cell_height / 2.0,
        );

        let size_variation = (phase + diagonal * 0.5).sin() * 0.3 + 1.0;

        let cycle = (self.palette_len * 2) as f64;
        let color_index = (((diagonal + phase * 10.0) % cycle) / 2.0).floor() as usize % self.palette_len;

        CellParams {
            row,
            col,
            final_row,
            final_col,
            center,
            size: self.base_size * size_variation,
            color_index,
            alpha: 0.7 + (phase + diagonal).sin() * 0.2,
            rotation: phase * 0.5 + diagonal * 0.1,
            primitive: Primitive::for_cell(self.shape, row, col),
        }
    }

    /// All cells, row-major
    pub fn cells(&self) -> impl Iterator<Item = CellParams> + '_ {
        (0..GRID_SIZE).flat_map(move |row| (0..GRID_SIZE).map(move |col| self.cell(row, col)))
    }
}

/// Draw one frame of the pattern into `surface`.
///
/// The whole `width × height` region is overwritten; prior contents never
/// show through. A zero-sized surface draws nothing. An empty palette
/// clears to the background and skips the grid.
pub fn render_frame<S: Surface + ?Sized>(
    surface: &mut S,
    width: u32,
    height: u32,
    params: &RenderParams<'_>,
) {
    if width == 0 || height == 0 {
        tracing::debug!("Skipping frame for zero-sized surface {}x{}", width, height);
        return;
    }

    surface.set_global_alpha(1.0);
    surface.fill_rect(0.0, 0.0, f64::from(width), f64::from(height), BACKGROUND);

    let encoding = params.encoding;
    let Some(layout) = FrameLayout::new(encoding, params.frame_index, width, height) else {
        tracing::debug!("Skipping grid for encoding with empty palette");
        return;
    };

    for cell in layout.cells() {
        let color = encoding.color_palette[cell.color_index];

        surface.set_global_alpha(cell.alpha);
        surface.save();
        surface.translate(cell.center.x, cell.center.y);
        surface.rotate(cell.rotation);
        cell.primitive.draw(surface, cell.size, color);
        surface.restore();
    }

    surface.set_global_alpha(1.0);
}
