//! Encoding Engine - the emotion → encoding table
//!
//! Table rows are frozen: posts persist the resolved encoding, and renders
//! of historical posts must stay reproducible.

use serde::{Deserialize, Serialize};

use super::primitives::{Color, Shape};
use crate::{EmotionKey, Error};

/// Highest meaningful symmetry level
pub const MAX_SYMMETRY_LEVEL: u8 = 4;

/// How an emotion is drawn.
///
/// Field names serialize in the stored-post form (`colorPalette`,
/// `symmetryLevel`, `movementSpeed`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualEncoding {
    /// Ordered palette, indexed by the renderer's color selection
    pub color_palette: Vec<Color>,
    pub shape: Shape,
    /// 0 = no folding, 2 = columns mirrored, 3+ = columns and rows mirrored
    pub symmetry_level: u8,
    /// Phase advance multiplier
    pub movement_speed: f64,
}

impl VisualEncoding {
    /// Check an encoding that came from outside the table (e.g. a stored post)
    pub fn validate(&self) -> crate::Result<()> {
        if self.color_palette.is_empty() {
            return Err(Error::InvalidEncoding("color palette is empty".into()));
        }
        if self.symmetry_level > MAX_SYMMETRY_LEVEL {
            return Err(Error::InvalidEncoding(format!(
                "symmetry level {} exceeds {}",
                self.symmetry_level, MAX_SYMMETRY_LEVEL
            )));
        }
        if !self.movement_speed.is_finite() || self.movement_speed <= 0.0 {
            return Err(Error::InvalidEncoding(format!(
                "movement speed must be positive, got {}",
                self.movement_speed
            )));
        }
        Ok(())
    }
}

/// One row of the encoding table
struct EncodingRow {
    emotion: EmotionKey,
    palette: &'static [Color],
    shape: Shape,
    symmetry_level: u8,
    movement_speed: f64,
}

impl EncodingRow {
    fn to_encoding(&self) -> VisualEncoding {
        VisualEncoding {
            color_palette: self.palette.to_vec(),
            shape: self.shape,
            symmetry_level: self.symmetry_level,
            movement_speed: self.movement_speed,
        }
    }
}

/// Indexed by `EmotionKey` discriminant; the array length pins totality.
static ENCODING_TABLE: [EncodingRow; EmotionKey::COUNT] = [
    EncodingRow {
        emotion: EmotionKey::Calm,
        palette: &[
            Color::from_u32(0xE8F4F8),
            Color::from_u32(0xB8D4E3),
            Color::from_u32(0x7FB3D3),
            Color::from_u32(0x4A90A4),
        ],
        shape: Shape::Circle,
        symmetry_level: 4,
        movement_speed: 0.3,
    },
    EncodingRow {
        emotion: EmotionKey::Joy,
        palette: &[
            Color::from_u32(0xFFE66D),
            Color::from_u32(0xFF6B6B),
            Color::from_u32(0xFF8E53),
            Color::from_u32(0xFFA07A),
        ],
        shape: Shape::Circle,
        symmetry_level: 3,
        movement_speed: 0.8,
    },
    EncodingRow {
        emotion: EmotionKey::Fear,
        palette: &[
            Color::from_u32(0x2C1810),
            Color::from_u32(0x4A3728),
            Color::from_u32(0x6B4423),
            Color::from_u32(0x8B4513),
        ],
        shape: Shape::Triangle,
        symmetry_level: 1,
        movement_speed: 1.5,
    },
    EncodingRow {
        emotion: EmotionKey::Urgency,
        palette: &[
            Color::from_u32(0xFF1744),
            Color::from_u32(0xFF6F00),
            Color::from_u32(0xFFC400),
            Color::from_u32(0xFF3D00),
        ],
        shape: Shape::Square,
        symmetry_level: 2,
        movement_speed: 2.0,
    },
    EncodingRow {
        emotion: EmotionKey::Trust,
        palette: &[
            Color::from_u32(0x1E3A8A),
            Color::from_u32(0x3B82F6),
            Color::from_u32(0x60A5FA),
            Color::from_u32(0x93C5FD),
        ],
        shape: Shape::Mixed,
        symmetry_level: 4,
        movement_speed: 0.5,
    },
];

/// Resolve the visual encoding for an emotion.
///
/// Returns a fresh copy; mutating it never affects later lookups.
pub fn get_visual_encoding(emotion: EmotionKey) -> VisualEncoding {
    let row = &ENCODING_TABLE[emotion.index()];
    debug_assert_eq!(row.emotion, emotion);
    row.to_encoding()
}

/// Every emotion, in declaration order.
pub fn get_all_emotions() -> Vec<EmotionKey> {
    ENCODING_TABLE.iter().map(|row| row.emotion).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexes(encoding: &VisualEncoding) -> Vec<String> {
        encoding.color_palette.iter().map(Color::to_hex).collect()
    }

    #[test]
    fn test_table_rows_match_discriminants() {
        for (i, row) in ENCODING_TABLE.iter().enumerate() {
            assert_eq!(row.emotion.index(), i);
        }
    }

    #[test]
    fn test_all_emotions_order() {
        assert_eq!(
            get_all_emotions(),
            vec![
                EmotionKey::Calm,
                EmotionKey::Joy,
                EmotionKey::Fear,
                EmotionKey::Urgency,
                EmotionKey::Trust,
            ]
        );
    }

    #[test]
    fn test_reference_encodings() {
        let calm = get_visual_encoding(EmotionKey::Calm);
        assert_eq!(hexes(&calm), ["#E8F4F8", "#B8D4E3", "#7FB3D3", "#4A90A4"]);
        assert_eq!(calm.shape, Shape::Circle);
        assert_eq!(calm.symmetry_level, 4);
        assert_eq!(calm.movement_speed, 0.3);

        let joy = get_visual_encoding(EmotionKey::Joy);
        assert_eq!(hexes(&joy), ["#FFE66D", "#FF6B6B", "#FF8E53", "#FFA07A"]);
        assert_eq!(joy.shape, Shape::Circle);
        assert_eq!(joy.symmetry_level, 3);
        assert_eq!(joy.movement_speed, 0.8);

        let fear = get_visual_encoding(EmotionKey::Fear);
        assert_eq!(hexes(&fear), ["#2C1810", "#4A3728", "#6B4423", "#8B4513"]);
        assert_eq!(fear.shape, Shape::Triangle);
        assert_eq!(fear.symmetry_level, 1);
        assert_eq!(fear.movement_speed, 1.5);

        let urgency = get_visual_encoding(EmotionKey::Urgency);
        assert_eq!(hexes(&urgency), ["#FF1744", "#FF6F00", "#FFC400", "#FF3D00"]);
        assert_eq!(urgency.shape, Shape::Square);
        assert_eq!(urgency.symmetry_level, 2);
        assert_eq!(urgency.movement_speed, 2.0);

        let trust = get_visual_encoding(EmotionKey::Trust);
        assert_eq!(hexes(&trust), ["#1E3A8A", "#3B82F6", "#60A5FA", "#93C5FD"]);
        assert_eq!(trust.shape, Shape::Mixed);
        assert_eq!(trust.symmetry_level, 4);
        assert_eq!(trust.movement_speed, 0.5);
    }

    #[test]
    fn test_lookup_deterministic_and_isolated() {
        let mut first = get_visual_encoding(EmotionKey::Joy);
        first.color_palette.clear();
        first.movement_speed = 99.0;

        let second = get_visual_encoding(EmotionKey::Joy);
        assert_eq!(second, get_visual_encoding(EmotionKey::Joy));
        assert_eq!(second.color_palette.len(), 4);
        assert_eq!(second.movement_speed, 0.8);
    }

    #[test]
    fn test_encodings_distinguishable() {
        let all: Vec<_> = get_all_emotions().into_iter().map(get_visual_encoding).collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.color_palette, b.color_palette);
                assert!(
                    a.shape != b.shape
                        || a.symmetry_level != b.symmetry_level
                        || a.movement_speed != b.movement_speed
                );
            }
        }
    }

    #[test]
    fn test_table_encodings_validate() {
        for emotion in get_all_emotions() {
            get_visual_encoding(emotion).validate().unwrap();
        }
    }

    #[test]
    fn test_validate_rejects_degenerate() {
        let mut encoding = get_visual_encoding(EmotionKey::Calm);
        encoding.color_palette.clear();
        assert!(encoding.validate().is_err());

        let mut encoding = get_visual_encoding(EmotionKey::Calm);
        encoding.symmetry_level = 5;
        assert!(encoding.validate().is_err());

        let mut encoding = get_visual_encoding(EmotionKey::Calm);
        encoding.movement_speed = 0.0;
        assert!(encoding.validate().is_err());

        encoding.movement_speed = f64::NAN;
        assert!(encoding.validate().is_err());
    }

    #[test]
    fn test_stored_json_shape() {
        let json = serde_json::to_value(get_visual_encoding(EmotionKey::Urgency)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "colorPalette": ["#FF1744", "#FF6F00", "#FFC400", "#FF3D00"],
                "shape": "square",
                "symmetryLevel": 2,
                "movementSpeed": 2.0,
            })
        );

        let back: VisualEncoding = serde_json::from_value(json).unwrap();
        assert_eq!(back, get_visual_encoding(EmotionKey::Urgency));
    }
}
