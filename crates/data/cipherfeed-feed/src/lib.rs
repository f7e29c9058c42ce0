//! # CipherFeed Feed
//!
//! Posts carry an emotion as a pattern. The pattern is public; the
//! emotion label is revealed on request, optionally behind a 4-digit PIN.
//!
//! ```text
//! CreatePostInput ──validate──► Post::create ──► FeedStorage (JSON, newest first)
//!                                    │
//!                                    ├── encoding  (resolved once, stored verbatim)
//!                                    └── pin_hash  (SHA-256 hex, never the PIN)
//!
//! RevealGate ── reveal(post, pin) ──► EmotionKey | PinRequired | IncorrectPin
//! ```

pub mod feed;
pub mod persistence;
pub mod pin;
pub mod post;
pub mod reveal;

pub use feed::Feed;
pub use persistence::FeedStorage;
pub use pin::{hash_pin, verify_pin, PIN_LENGTH};
pub use post::{caption_length, AuthorMode, CreatePostInput, Post, ValidationError, MAX_CAPTION_LENGTH};
pub use reveal::{RevealError, RevealGate};

/// Result type for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Errors that can occur in cipherfeed-feed
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
