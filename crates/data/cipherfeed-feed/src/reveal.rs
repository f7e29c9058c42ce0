//! Per-viewer reveal state
//!
//! Only the emotion label is gated. The pattern is always shown.

use cipherfeed_core::EmotionKey;

use crate::pin::{verify_pin, PIN_LENGTH};
use crate::post::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RevealError {
    #[error("Please enter a 4-digit PIN")]
    PinRequired,

    #[error("Incorrect PIN")]
    IncorrectPin,

    #[error("Post data is damaged and cannot be revealed")]
    MalformedPost,
}

/// Hidden until a successful [`RevealGate::reveal`], hidden again on
/// [`RevealGate::hide`]. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct RevealGate {
    revealed: bool,
}

impl RevealGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn reveal(&mut self, post: &Post, pin: Option<&str>) -> Result<EmotionKey, RevealError> {
        if let Err(e) = post.validate() {
            tracing::warn!("Refusing to reveal post {}: {}", post.id, e);
            return Err(RevealError::MalformedPost);
        }

        if post.has_pin {
            let pin = pin
                .filter(|p| p.chars().count() == PIN_LENGTH)
                .ok_or(RevealError::PinRequired)?;

            // Posts flagged protected without a digest predate hashing
            if let Some(digest) = &post.pin_hash {
                if !verify_pin(pin, digest) {
                    tracing::debug!("Incorrect PIN for post {}", post.id);
                    return Err(RevealError::IncorrectPin);
                }
            }
        }

        self.revealed = true;
        Ok(post.emotion)
    }

    pub fn hide(&mut self) {
        self.revealed = false;
    }

    /// The emotion if currently revealed
    pub fn emotion(&self, post: &Post) -> Option<EmotionKey> {
        self.revealed.then_some(post.emotion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::CreatePostInput;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn post(input: CreatePostInput) -> Post {
        Post::create_at(input, 0, &mut StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn test_unprotected_reveals() {
        let post = post(CreatePostInput::new(EmotionKey::Joy));
        let mut gate = RevealGate::new();

        assert_eq!(gate.emotion(&post), None);
        assert_eq!(gate.reveal(&post, None), Ok(EmotionKey::Joy));
        assert!(gate.is_revealed());
        assert_eq!(gate.emotion(&post), Some(EmotionKey::Joy));

        gate.hide();
        assert!(!gate.is_revealed());
    }

    #[test]
    fn test_pin_required() {
        let post = post(CreatePostInput::new(EmotionKey::Fear).with_pin("1234"));
        let mut gate = RevealGate::new();

        assert_eq!(gate.reveal(&post, None), Err(RevealError::PinRequired));
        assert_eq!(gate.reveal(&post, Some("12")), Err(RevealError::PinRequired));
        assert_eq!(
            RevealError::PinRequired.to_string(),
            "Please enter a 4-digit PIN"
        );
        assert!(!gate.is_revealed());
    }

    #[test]
    fn test_wrong_then_right_pin() {
        let post = post(CreatePostInput::new(EmotionKey::Trust).with_pin("1234"));
        let mut gate = RevealGate::new();

        assert_eq!(gate.reveal(&post, Some("4321")), Err(RevealError::IncorrectPin));
        assert!(!gate.is_revealed());
        assert_eq!(RevealError::IncorrectPin.to_string(), "Incorrect PIN");

        assert_eq!(gate.reveal(&post, Some("1234")), Ok(EmotionKey::Trust));
        assert!(gate.is_revealed());
    }

    #[test]
    fn test_damaged_post_not_revealed() {
        let mut post = post(CreatePostInput::new(EmotionKey::Joy).with_pin("1234"));
        post.pin_hash = Some("legacyhash".into());

        let mut gate = RevealGate::new();
        assert_eq!(gate.reveal(&post, Some("1234")), Err(RevealError::MalformedPost));
        assert!(!gate.is_revealed());

        let mut post = post.clone();
        post.has_pin = false;
        post.pin_hash = None;
        post.encoding.color_palette.clear();
        assert_eq!(gate.reveal(&post, None), Err(RevealError::MalformedPost));
    }

    #[test]
    fn test_flagged_without_digest_reveals() {
        let mut post = post(CreatePostInput::new(EmotionKey::Calm).with_pin("1234"));
        post.pin_hash = None;

        let mut gate = RevealGate::new();
        assert_eq!(gate.reveal(&post, Some("0000")), Ok(EmotionKey::Calm));
    }
}
