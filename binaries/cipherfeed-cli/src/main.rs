//! CipherFeed CLI
//!
//! Emotion patterns and PIN-gated posts from the command line.

mod pattern;
mod post;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cipherfeed_config::Config;
use cipherfeed_core::EmotionKey;

#[derive(Parser)]
#[command(name = "cipherfeed")]
#[command(about = "CipherFeed - emotions encoded as animated geometric patterns")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/cipherfeed/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the emotion vocabulary
    Emotions,

    /// Show the visual encoding for an emotion
    Encoding {
        emotion: EmotionKey,

        /// Print the stored JSON form
        #[arg(long)]
        json: bool,
    },

    /// Render a single frame to PNG or SVG
    Render {
        emotion: EmotionKey,

        /// Output file (.png or .svg)
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, default_value_t = 0)]
        frame: u64,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,
    },

    /// Print per-cell parameters for a frame
    Inspect {
        emotion: EmotionKey,

        #[arg(short, long, default_value_t = 0)]
        frame: u64,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,
    },

    /// Play an animation, writing each frame as a PNG
    Animate {
        emotion: EmotionKey,

        /// Number of frames to write
        #[arg(short = 'n', long, default_value_t = 60)]
        frames: u64,

        /// Directory for frame_NNNNN.png files
        #[arg(short, long)]
        out_dir: PathBuf,

        #[arg(long)]
        fps: Option<u32>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,
    },

    /// Feed posts
    Post {
        #[command(subcommand)]
        command: post::PostCommands,
    },
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config.log.filter);

    match cli.command {
        Commands::Emotions => pattern::cmd_emotions(),
        Commands::Encoding { emotion, json } => pattern::cmd_encoding(emotion, json),
        Commands::Render {
            emotion,
            output,
            frame,
            width,
            height,
        } => pattern::cmd_render(
            emotion,
            &output,
            frame,
            width.unwrap_or(config.render.width),
            height.unwrap_or(config.render.height),
        ),
        Commands::Inspect {
            emotion,
            frame,
            width,
            height,
        } => pattern::cmd_inspect(
            emotion,
            frame,
            width.unwrap_or(config.render.width),
            height.unwrap_or(config.render.height),
        ),
        Commands::Animate {
            emotion,
            frames,
            out_dir,
            fps,
            width,
            height,
        } => {
            pattern::cmd_animate(
                emotion,
                frames,
                out_dir,
                fps.unwrap_or(config.render.fps),
                width.unwrap_or(config.render.width),
                height.unwrap_or(config.render.height),
            )
            .await
        }
        Commands::Post { command } => post::cmd_post(command, &config),
    }
}
