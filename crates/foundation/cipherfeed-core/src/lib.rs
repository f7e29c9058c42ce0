//! # CipherFeed Core
//!
//! The closed emotion vocabulary and its deterministic visual encodings.
//!
//! ```text
//! EmotionKey ──► get_visual_encoding() ──► VisualEncoding
//!   calm                                    ├── color_palette: [Color]
//!   joy                                     ├── shape: Shape
//!   fear                                    ├── symmetry_level: 0..=4
//!   urgency                                 └── movement_speed: f64
//!   trust
//! ```
//!
//! Same emotion always yields the same encoding. Stored posts embed the
//! resolved encoding, so the table values are frozen for compatibility.

pub mod emotion;
pub mod encoding;

pub use emotion::EmotionKey;
pub use encoding::{
    get_all_emotions, get_visual_encoding, Color, Shape, VisualEncoding, MAX_SYMMETRY_LEVEL,
};

/// Result type for cipherfeed-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cipherfeed-core
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid visual encoding: {0}")]
    InvalidEncoding(String),
}
