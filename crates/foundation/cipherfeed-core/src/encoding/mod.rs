//! Visual Encoding - Emotion → palette/shape/symmetry/speed
//!
//! The mapping is a static table, one row per emotion, so lookup is total
//! over the closed vocabulary.

mod engine;
mod primitives;

pub use engine::{get_all_emotions, get_visual_encoding, VisualEncoding, MAX_SYMMETRY_LEVEL};
pub use primitives::{Color, Shape};
