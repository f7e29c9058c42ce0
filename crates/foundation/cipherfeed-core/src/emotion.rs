//! Emotion vocabulary
//!
//! Closed set. Adding an emotion is a code change: a new variant here and a
//! new row in the encoding table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An emotion a post can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum EmotionKey {
    Calm = 0,
    Joy = 1,
    Fear = 2,
    Urgency = 3,
    Trust = 4,
}

impl EmotionKey {
    /// Number of emotions in the vocabulary
    pub const COUNT: usize = 5;

    /// Every emotion, in declaration order
    pub const ALL: [EmotionKey; Self::COUNT] = [
        Self::Calm,
        Self::Joy,
        Self::Fear,
        Self::Urgency,
        Self::Trust,
    ];

    /// Lowercase identifier, as stored in posts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Joy => "joy",
            Self::Fear => "fear",
            Self::Urgency => "urgency",
            Self::Trust => "trust",
        }
    }

    /// Capitalized display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::Joy => "Joy",
            Self::Fear => "Fear",
            Self::Urgency => "Urgency",
            Self::Trust => "Trust",
        }
    }

    /// Position in the encoding table
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EmotionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == s)
            .ok_or_else(|| Error::UnknownEmotion(s.to_string()))
    }
}
