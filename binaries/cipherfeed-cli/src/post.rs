//! Post commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use cipherfeed_config::Config;
use cipherfeed_core::EmotionKey;
use cipherfeed_feed::{AuthorMode, CreatePostInput, Feed, FeedStorage, Post, RevealGate};

use crate::pattern::write_frame;

#[derive(Subcommand)]
pub enum PostCommands {
    /// Publish a post
    Create {
        emotion: EmotionKey,

        /// Show as "User" instead of "Anonymous"
        #[arg(long)]
        named: bool,

        /// Up to 80 characters
        #[arg(short, long)]
        caption: Option<String>,

        /// 4-digit PIN required to reveal the emotion
        #[arg(long)]
        pin: Option<String>,
    },

    /// List posts, newest first
    List,

    /// Reveal a post's emotion
    Reveal {
        id: String,

        #[arg(long)]
        pin: Option<String>,
    },

    /// Render a post's pattern to PNG or SVG
    Render {
        id: String,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, default_value_t = 0)]
        frame: u64,
    },

    /// Delete every post
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn cmd_post(command: PostCommands, config: &Config) -> Result<()> {
    let mut feed = Feed::open(FeedStorage::at_path(config.storage_path()))?;

    match command {
        PostCommands::Create {
            emotion,
            named,
            caption,
            pin,
        } => {
            let mut input = CreatePostInput::new(emotion).with_author(if named {
                AuthorMode::Named
            } else {
                AuthorMode::Anonymous
            });
            input.caption = caption;
            input.pin = pin;

            let post = feed.create_post(input)?;
            println!("\n  POST CREATED");
            println!("  ID: {}", post.id);
            if post.has_pin {
                println!("  Emotion locked behind PIN");
            }
        }

        PostCommands::List => {
            if feed.is_empty() {
                println!("  No posts yet");
                return Ok(());
            }
            println!("\n  FEED ({} posts)\n", feed.len());
            for post in feed.posts() {
                print_post(post);
            }
        }

        PostCommands::Reveal { id, pin } => {
            let post = feed.require(&id)?;
            let mut gate = RevealGate::new();
            let emotion = gate.reveal(post, pin.as_deref())?;
            println!("  {} feels: {}", post.author_name(), emotion.label());
        }

        PostCommands::Render { id, output, frame } => {
            let post = feed.require(&id)?;
            // Stored encodings render as they are; a bad one only loses its grid
            if let Err(e) = post.encoding.validate() {
                tracing::warn!("Post {} has a damaged encoding: {}", post.id, e);
            }
            let (width, height) = (config.render.card_width, config.render.card_height);
            write_frame(&post.encoding, frame, width, height, &output)?;
            println!("  Pattern for {} written to: {}", post.id, output.display());
        }

        PostCommands::Clear { yes } => {
            if !yes {
                anyhow::bail!(
                    "Refusing to clear {} posts without --yes (this cannot be undone)",
                    feed.len()
                );
            }
            feed.clear_all()?;
            println!("  Feed cleared");
        }
    }

    Ok(())
}

fn print_post(post: &Post) {
    let when = post
        .created_at_utc()
        .map(|t| t.format("%b %-d, %Y, %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    let lock = if post.has_pin { "  [PIN]" } else { "" };

    println!("  {}  {} · {}{}", post.id, post.author_name(), when, lock);
    if let Some(caption) = &post.caption {
        println!("    \"{}\"", caption);
    }
}
