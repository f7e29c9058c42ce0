//! In-memory feed backed by [`FeedStorage`]

use crate::persistence::FeedStorage;
use crate::post::{CreatePostInput, Post};
use crate::{FeedError, Result};

/// Posts newest first, kept in step with the feed file
#[derive(Debug)]
pub struct Feed {
    storage: FeedStorage,
    posts: Vec<Post>,
}

impl Feed {
    /// Open the feed, loading whatever is stored
    pub fn open(storage: FeedStorage) -> Result<Self> {
        let posts = storage.load()?;
        tracing::debug!("Loaded {} posts from {}", posts.len(), storage.path().display());
        Ok(Self { storage, posts })
    }

    pub fn storage(&self) -> &FeedStorage {
        &self.storage
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Like [`Feed::get`], but a missing id is an error
    pub fn require(&self, id: &str) -> Result<&Post> {
        self.get(id).ok_or_else(|| FeedError::PostNotFound(id.to_string()))
    }

    /// Validate, persist, then show the new post first
    pub fn create_post(&mut self, input: CreatePostInput) -> Result<&Post> {
        let post = Post::create(input)?;
        self.storage.add_post(&post)?;
        tracing::info!(
            "Created post {} ({}{})",
            post.id,
            post.author_name(),
            if post.has_pin { ", PIN protected" } else { "" }
        );

        self.posts.insert(0, post);
        Ok(&self.posts[0])
    }

    /// Remove every post, on disk and in memory
    pub fn clear_all(&mut self) -> Result<()> {
        self.storage.clear()?;
        let cleared = self.posts.len();
        self.posts.clear();
        tracing::info!("Cleared {} posts", cleared);
        Ok(())
    }

    /// Re-read from disk
    pub fn reload(&mut self) -> Result<()> {
        self.posts = self.storage.load()?;
        Ok(())
    }
}
