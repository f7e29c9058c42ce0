//! Post persistence layer
//!
//! Stores the feed as a JSON array of posts, newest first.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::post::Post;

/// Required fields and their JSON types
fn has_post_fields(entry: &Value) -> bool {
    entry["id"].is_string()
        && entry["createdAt"].is_number()
        && entry["authorMode"].is_string()
        && entry["emotion"].is_string()
        && entry["hasPin"].is_boolean()
        && entry["encoding"]["colorPalette"].is_array()
}

/// Feed file location and operations
#[derive(Debug, Clone)]
pub struct FeedStorage {
    path: PathBuf,
}

impl FeedStorage {
    /// Create storage at specific path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the feed file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load posts from disk.
    ///
    /// A missing, unparsable or non-array file yields an empty feed.
    /// Entries missing a required field are skipped; nothing else is
    /// checked here, so old posts keep rendering exactly as stored.
    pub fn load(&self) -> crate::Result<Vec<Post>> {
        let posts = self
            .read_entries()?
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Post>(entry) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::debug!("Skipping unreadable stored post: {}", e);
                    None
                }
            })
            .collect();
        Ok(posts)
    }

    /// Save posts to disk
    pub fn save(&self, posts: &[Post]) -> crate::Result<()> {
        self.write_atomic(&serde_json::to_string_pretty(posts)?)?;
        tracing::debug!("Saved {} posts to {}", posts.len(), self.path.display());
        Ok(())
    }

    /// Prepend a post to what is on disk. Stored entries are carried over
    /// as they are, including ones this version cannot read.
    pub fn add_post(&self, post: &Post) -> crate::Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(0, serde_json::to_value(post)?);
        self.write_atomic(&serde_json::to_string_pretty(&entries)?)?;
        tracing::debug!("Saved {} posts to {}", entries.len(), self.path.display());
        Ok(())
    }

    /// Raw stored entries that have every required post field
    fn read_entries(&self) -> crate::Result<Vec<Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let entries = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                tracing::warn!("Invalid posts data in {}, resetting", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                tracing::warn!("Could not parse {}: {}", self.path.display(), e);
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let entries: Vec<Value> = entries.into_iter().filter(has_post_fields).collect();
        if entries.len() < total {
            tracing::warn!(
                "Dropped {} malformed posts from {}",
                total - entries.len(),
                self.path.display()
            );
        }
        Ok(entries)
    }

    fn write_atomic(&self, content: &str) -> crate::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename (atomic)
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)?;
        if let Err(e) = std::fs::rename(&temp_path, &self.path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Delete the feed file
    pub fn clear(&self) -> crate::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::CreatePostInput;
    use cipherfeed_core::EmotionKey;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn post(emotion: EmotionKey, at: i64) -> Post {
        Post::create_at(CreatePostInput::new(emotion), at, &mut StdRng::seed_from_u64(at as u64)).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let storage = FeedStorage::at_path(dir.path().join("posts.json"));

        assert!(!storage.exists());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = FeedStorage::at_path(dir.path().join("posts.json"));
        let posts = vec![post(EmotionKey::Joy, 2), post(EmotionKey::Calm, 1)];

        storage.save(&posts).unwrap();
        assert!(storage.exists());
        assert!(!dir.path().join("posts.json.tmp").exists());
        assert_eq!(storage.load().unwrap(), posts);
    }

    #[test]
    fn test_add_post_prepends() {
        let dir = tempdir().unwrap();
        let storage = FeedStorage::at_path(dir.path().join("nested").join("posts.json"));

        let first = post(EmotionKey::Fear, 1);
        let second = post(EmotionKey::Trust, 2);
        storage.add_post(&first).unwrap();
        storage.add_post(&second).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, vec![second, first]);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let storage = FeedStorage::at_path(&path);

        std::fs::write(&path, "{not json").unwrap();
        assert!(storage.load().unwrap().is_empty());

        std::fs::write(&path, r#"{"posts": []}"#).unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_entries_missing_fields_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let storage = FeedStorage::at_path(&path);

        let good = post(EmotionKey::Urgency, 5);
        let entries = serde_json::json!([
            serde_json::to_value(&good).unwrap(),
            {"id": "post_1_abc", "createdAt": "yesterday"},
            null,
        ]);
        std::fs::write(&path, entries.to_string()).unwrap();

        assert_eq!(storage.load().unwrap(), vec![good]);
    }

    #[test]
    fn test_legacy_posts_survive_add() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let storage = FeedStorage::at_path(&path);

        let mut empty_palette = serde_json::to_value(post(EmotionKey::Joy, 4)).unwrap();
        empty_palette["encoding"]["colorPalette"] = serde_json::json!([]);
        let mut short_digest = serde_json::to_value(post(EmotionKey::Fear, 3)).unwrap();
        short_digest["hasPin"] = serde_json::json!(true);
        short_digest["pinHash"] = serde_json::json!("legacyhash");
        let mut odd_color = serde_json::to_value(post(EmotionKey::Calm, 2)).unwrap();
        odd_color["encoding"]["colorPalette"] = serde_json::json!(["teal"]);

        let stored = vec![empty_palette, short_digest, odd_color];
        std::fs::write(&path, Value::Array(stored.clone()).to_string()).unwrap();

        // the first two read back; the third only lives on disk
        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].encoding.color_palette.is_empty());
        assert_eq!(loaded[1].pin_hash.as_deref(), Some("legacyhash"));

        let newest = post(EmotionKey::Trust, 9);
        storage.add_post(&newest).unwrap();

        let on_disk: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 4);
        assert_eq!(on_disk[0], serde_json::to_value(&newest).unwrap());
        assert_eq!(&on_disk[1..], &stored[..]);
        assert_eq!(storage.load().unwrap().len(), 3);
    }

    #[test]
    fn test_failed_rename_cleans_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.json");
        // a directory in the way makes the rename fail
        std::fs::create_dir(&path).unwrap();
        let storage = FeedStorage::at_path(&path);

        assert!(storage.save(&[post(EmotionKey::Calm, 1)]).is_err());
        assert!(!dir.path().join("posts.json.tmp").exists());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempdir().unwrap();
        let storage = FeedStorage::at_path(dir.path().join("posts.json"));

        storage.save(&[post(EmotionKey::Calm, 1)]).unwrap();
        storage.clear().unwrap();
        assert!(!storage.exists());
        assert!(storage.load().unwrap().is_empty());

        // clearing twice is fine
        storage.clear().unwrap();
    }
}
