//! # CipherFeed Render
//!
//! Turns a `VisualEncoding` plus a frame index into one drawn frame.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ clear #0A0A0A                               │
//! │ ┌──┬──┬──┬──┬──┬──┬──┬──┐                   │
//! │ │○ │□ │△ │○ │  │  │  │  │  8×8 grid         │
//! │ ├──┼──┼──┼──┼──┼──┼──┼──┤  phase = f·v·0.01 │
//! │ │  │  │  │  │  │  │  │  │        mod 2π     │
//! │ └──┴──┴──┴──┴──┴──┴──┴──┘                   │
//! │ per cell: fold → size → color → alpha → rot │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering is pure apart from the drawing itself: no clocks, no
//! randomness, no state kept between calls. Any `Surface` works; three
//! ship here:
//!
//! - [`PixelSurface`]: software rasterizer, PNG export
//! - [`SvgSurface`]: SVG document
//! - [`RecordingSurface`]: draw-command log

pub mod frame;
pub mod raster;
pub mod recording;
pub mod shape;
pub mod surface;
pub mod svg;

pub use frame::{
    fold, phase, render_frame, CellParams, FrameLayout, RenderParams, BACKGROUND, GRID_SIZE,
};
pub use raster::PixelSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use shape::Primitive;
pub use surface::{DrawState, StateStack, Surface};
pub use svg::SvgSurface;

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors from exporting rendered frames
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
