//! Post definitions and creation

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use cipherfeed_core::{get_visual_encoding, EmotionKey, VisualEncoding};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pin::{hash_pin, is_pin_digest, PIN_LENGTH};

/// Longest caption a post accepts, in UTF-16 code units
pub const MAX_CAPTION_LENGTH: usize = 80;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Rejected post input or malformed stored post
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Caption must be 80 characters or less")]
    CaptionTooLong,

    #[error("PIN must be exactly 4 digits")]
    PinLength,

    #[error("PIN must contain only digits")]
    PinNotDigits,

    #[error("Unknown author mode: {0}")]
    UnknownAuthorMode(String),

    #[error("Malformed post: {0}")]
    Malformed(String),

    #[error(transparent)]
    Encoding(#[from] cipherfeed_core::Error),
}

/// How the author is shown on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorMode {
    #[default]
    Anonymous,
    Named,
}

impl AuthorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Named => "named",
        }
    }

    /// Name shown on the card
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Anonymous => "Anonymous",
            Self::Named => "User",
        }
    }
}

impl fmt::Display for AuthorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anonymous" => Ok(Self::Anonymous),
            "named" => Ok(Self::Named),
            _ => Err(ValidationError::UnknownAuthorMode(s.to_string())),
        }
    }
}

/// What the author submits. The PIN is plain here and hashed on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostInput {
    pub author_mode: AuthorMode,
    pub caption: Option<String>,
    pub emotion: EmotionKey,
    pub pin: Option<String>,
}

impl CreatePostInput {
    pub fn new(emotion: EmotionKey) -> Self {
        Self {
            author_mode: AuthorMode::Anonymous,
            caption: None,
            emotion,
            pin: None,
        }
    }

    pub fn with_author(mut self, mode: AuthorMode) -> Self {
        self.author_mode = mode;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }

    /// Caption length is checked before trimming
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(caption) = &self.caption {
            if caption_length(caption) > MAX_CAPTION_LENGTH {
                return Err(ValidationError::CaptionTooLong);
            }
        }
        if let Some(pin) = &self.pin {
            if pin.chars().count() != PIN_LENGTH {
                return Err(ValidationError::PinLength);
            }
            if !pin.chars().all(|c| c.is_ascii_digit()) {
                return Err(ValidationError::PinNotDigits);
            }
        }
        Ok(())
    }

    fn trimmed_caption(&self) -> Option<String> {
        self.caption
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

/// A published post, in its stored shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub author_mode: AuthorMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Resolved at creation; later table changes do not touch old posts
    pub encoding: VisualEncoding,
    pub emotion: EmotionKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_hash: Option<String>,
    pub has_pin: bool,
}

impl Post {
    /// Create a post stamped now
    pub fn create(input: CreatePostInput) -> Result<Self, ValidationError> {
        Self::create_at(input, Utc::now().timestamp_millis(), &mut rand::thread_rng())
    }

    /// Create a post with an explicit timestamp and id source
    pub fn create_at<R: Rng + ?Sized>(
        input: CreatePostInput,
        created_at: i64,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        input.validate()?;

        let pin_hash = input.pin.as_deref().map(hash_pin);
        Ok(Self {
            id: generate_id(created_at, rng),
            created_at,
            author_mode: input.author_mode,
            caption: input.trimmed_caption(),
            encoding: get_visual_encoding(input.emotion),
            emotion: input.emotion,
            has_pin: pin_hash.is_some(),
            pin_hash,
        })
    }

    /// Check a post read back from storage
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::Malformed("empty id".into()));
        }
        if let Some(caption) = &self.caption {
            if caption_length(caption) > MAX_CAPTION_LENGTH {
                return Err(ValidationError::CaptionTooLong);
            }
        }
        if let Some(digest) = &self.pin_hash {
            if !is_pin_digest(digest) {
                return Err(ValidationError::Malformed(format!(
                    "post {} has a malformed PIN hash",
                    self.id
                )));
            }
        }
        self.encoding.validate()?;
        Ok(())
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    pub fn author_name(&self) -> &'static str {
        self.author_mode.display_name()
    }

    pub fn is_protected(&self) -> bool {
        self.has_pin
    }
}

/// Caption length as web clients count it: astral characters take two units
pub fn caption_length(caption: &str) -> usize {
    caption.encode_utf16().count()
}

/// `post_<ms>_<9 base36 chars>`
fn generate_id<R: Rng + ?Sized>(created_at: i64, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("post_{}_{}", created_at, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_create_resolves_encoding() {
        let input = CreatePostInput::new(EmotionKey::Fear).with_caption("  storm coming  ");
        let post = Post::create_at(input, 1_700_000_000_000, &mut rng()).unwrap();

        assert_eq!(post.encoding, get_visual_encoding(EmotionKey::Fear));
        assert_eq!(post.emotion, EmotionKey::Fear);
        assert_eq!(post.caption.as_deref(), Some("storm coming"));
        assert_eq!(post.author_mode, AuthorMode::Anonymous);
        assert!(!post.has_pin);
        assert!(post.pin_hash.is_none());
    }

    #[test]
    fn test_id_format() {
        let post = Post::create_at(CreatePostInput::new(EmotionKey::Joy), 1234, &mut rng()).unwrap();
        let suffix = post.id.strip_prefix("post_1234_").unwrap();
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_pin_is_hashed() {
        let input = CreatePostInput::new(EmotionKey::Trust).with_pin("1234");
        let post = Post::create_at(input, 0, &mut rng()).unwrap();

        assert!(post.has_pin);
        assert_eq!(post.pin_hash.as_deref(), Some(hash_pin("1234").as_str()));

        let json = serde_json::to_string(&post).unwrap();
        assert!(!json.contains("\"1234\""));
    }

    #[test]
    fn test_blank_caption_dropped() {
        let input = CreatePostInput::new(EmotionKey::Calm).with_caption("   ");
        let post = Post::create_at(input, 0, &mut rng()).unwrap();
        assert!(post.caption.is_none());
    }

    #[test]
    fn test_validation_messages() {
        let long = CreatePostInput::new(EmotionKey::Calm).with_caption("x".repeat(81));
        assert_eq!(long.validate().unwrap_err().to_string(), "Caption must be 80 characters or less");

        let exact = CreatePostInput::new(EmotionKey::Calm).with_caption("x".repeat(80));
        assert!(exact.validate().is_ok());

        let short = CreatePostInput::new(EmotionKey::Calm).with_pin("123");
        assert_eq!(short.validate().unwrap_err().to_string(), "PIN must be exactly 4 digits");

        let letters = CreatePostInput::new(EmotionKey::Calm).with_pin("12a4");
        assert_eq!(letters.validate().unwrap_err().to_string(), "PIN must contain only digits");
    }

    #[test]
    fn test_caption_counts_utf16_units() {
        // 80 multi-byte BMP characters still fit
        let input = CreatePostInput::new(EmotionKey::Joy).with_caption("é".repeat(80));
        assert!(input.validate().is_ok());

        // each emoji is a surrogate pair
        assert_eq!(caption_length("😀"), 2);
        let input = CreatePostInput::new(EmotionKey::Joy).with_caption("😀".repeat(40));
        assert!(input.validate().is_ok());
        let input = CreatePostInput::new(EmotionKey::Joy).with_caption("😀".repeat(41));
        assert_eq!(input.validate(), Err(ValidationError::CaptionTooLong));
        let input = CreatePostInput::new(EmotionKey::Joy).with_caption("😀".repeat(80));
        assert_eq!(input.validate(), Err(ValidationError::CaptionTooLong));
    }

    #[test]
    fn test_invalid_input_rejected_by_create() {
        let input = CreatePostInput::new(EmotionKey::Joy).with_pin("12345");
        assert_eq!(
            Post::create_at(input, 0, &mut rng()).unwrap_err(),
            ValidationError::PinLength
        );
    }

    #[test]
    fn test_stored_shape() {
        let input = CreatePostInput::new(EmotionKey::Urgency).with_author(AuthorMode::Named);
        let post = Post::create_at(input, 42, &mut rng()).unwrap();
        let value = serde_json::to_value(&post).unwrap();

        assert_eq!(value["createdAt"], 42);
        assert_eq!(value["authorMode"], "named");
        assert_eq!(value["emotion"], "urgency");
        assert_eq!(value["hasPin"], false);
        assert!(value["encoding"]["colorPalette"].is_array());
        assert!(value.get("caption").is_none());
        assert!(value.get("pinHash").is_none());

        let back: Post = serde_json::from_value(value).unwrap();
        assert_eq!(back, post);
    }

    #[test]
    fn test_validate_stored_post() {
        let mut post = Post::create_at(CreatePostInput::new(EmotionKey::Calm), 0, &mut rng()).unwrap();
        assert!(post.validate().is_ok());

        post.pin_hash = Some("not-a-digest".into());
        assert!(matches!(post.validate(), Err(ValidationError::Malformed(_))));

        post.pin_hash = None;
        post.encoding.color_palette.clear();
        assert!(matches!(post.validate(), Err(ValidationError::Encoding(_))));
    }

    #[test]
    fn test_author_mode() {
        assert_eq!("named".parse::<AuthorMode>().unwrap(), AuthorMode::Named);
        assert_eq!("Anonymous".parse::<AuthorMode>().unwrap(), AuthorMode::Anonymous);
        assert!("ghost".parse::<AuthorMode>().is_err());
        assert_eq!(AuthorMode::Anonymous.display_name(), "Anonymous");
        assert_eq!(AuthorMode::Named.display_name(), "User");
    }

    #[test]
    fn test_created_at_utc() {
        let post = Post::create_at(CreatePostInput::new(EmotionKey::Joy), 1_000, &mut rng()).unwrap();
        assert_eq!(post.created_at_utc().unwrap().timestamp(), 1);
    }
}
