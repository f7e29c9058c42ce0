//! # CipherFeed Player
//!
//! Drives the frame renderer over time. The renderer has no clock; this
//! crate owns the loop:
//!
//! ```text
//! Player::spawn ──► tokio task
//!                   loop {
//!                     tick (fps) ─┐
//!                     cancelled? ─┴─► stop
//!                     render_frame(frame_index)
//!                     on_frame(frame_index, &surface)
//!                     frame_index += 1
//!                   }
//! PlayerHandle::stop().await ──► no render after this resolves
//! ```
//!
//! One player per pattern instance. Frame indices are strictly
//! increasing and a frame, once started, always completes.

use std::sync::Arc;
use std::time::Duration;

use cipherfeed_core::VisualEncoding;
use cipherfeed_render::{render_frame, RenderParams, Surface};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Error returned by a frame callback
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Frame callback failed at frame {frame}: {source}")]
    Frame {
        frame: u64,
        #[source]
        source: BoxError,
    },

    #[error("Playback task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Invalid playback config: {0}")]
    InvalidConfig(String),
}

/// Loop cadence and length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Frames per second
    pub fps: u32,
    /// Stop on its own after this many frames
    pub frame_limit: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            frame_limit: None,
        }
    }
}

impl PlaybackConfig {
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            ..Default::default()
        }
    }

    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    fn period(&self) -> Result<Duration> {
        if self.fps == 0 {
            return Err(PlayerError::InvalidConfig("fps must be non-zero".into()));
        }
        Ok(Duration::from_secs_f64(1.0 / f64::from(self.fps)))
    }
}

/// One animated pattern instance: an encoding, a surface, a frame counter
#[derive(Debug)]
pub struct Player<S> {
    encoding: VisualEncoding,
    surface: S,
    width: u32,
    height: u32,
    frame_index: u64,
}

impl<S: Surface> Player<S> {
    pub fn new(encoding: VisualEncoding, surface: S, width: u32, height: u32) -> Self {
        Self {
            encoding,
            surface,
            width,
            height,
            frame_index: 0,
        }
    }

    /// Index of the next frame to render
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn encoding(&self) -> &VisualEncoding {
        &self.encoding
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Render the current frame and advance. Returns the rendered index.
    pub fn step(&mut self) -> u64 {
        let frame = self.frame_index;
        let params = RenderParams::new(&self.encoding, frame);
        render_frame(&mut self.surface, self.width, self.height, &params);
        self.frame_index += 1;
        frame
    }

    fn limit_reached(&self, config: &PlaybackConfig) -> bool {
        config.frame_limit.is_some_and(|limit| self.frame_index >= limit)
    }
}

impl<S: Surface + Send + 'static> Player<S> {
    /// Run the loop on the tokio runtime.
    ///
    /// `on_frame` sees each frame right after it is drawn; an error ends
    /// playback. Dropping the handle also ends playback once no
    /// [`StopSignal`] clones remain.
    pub fn spawn<F>(self, config: PlaybackConfig, mut on_frame: F) -> Result<PlayerHandle<S>>
    where
        F: FnMut(u64, &S) -> std::result::Result<(), BoxError> + Send + 'static,
    {
        let period = config.period()?;
        let (cancel, mut cancelled) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut player = self;
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::debug!("Playback started at {} fps", config.fps);
            loop {
                if player.limit_reached(&config) {
                    tracing::debug!("Frame limit reached at {}", player.frame_index);
                    break;
                }

                tokio::select! {
                    biased;
                    _ = cancelled.changed() => break,
                    _ = ticker.tick() => {}
                }
                if *cancelled.borrow() {
                    break;
                }

                let frame = player.step();
                if let Err(source) = on_frame(frame, &player.surface) {
                    tracing::warn!("Frame callback failed at frame {}: {}", frame, source);
                    return Err(PlayerError::Frame { frame, source });
                }
            }
            tracing::debug!("Playback stopped after {} frames", player.frame_index);
            Ok(player)
        });

        Ok(PlayerHandle {
            cancel: StopSignal(Arc::new(cancel)),
            task,
        })
    }
}

/// Cancels a running player from elsewhere (e.g. a signal handler)
#[derive(Debug, Clone)]
pub struct StopSignal(Arc<watch::Sender<bool>>);

impl StopSignal {
    pub fn cancel(&self) {
        // Receiver gone means the loop already ended
        let _ = self.0.send(true);
    }
}

/// Control handle for a spawned player
#[derive(Debug)]
pub struct PlayerHandle<S> {
    cancel: StopSignal,
    task: JoinHandle<Result<Player<S>>>,
}

impl<S> PlayerHandle<S> {
    /// Signal cancellation without waiting
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel and wait. No frame is rendered after this resolves.
    pub async fn stop(self) -> Result<Player<S>> {
        self.cancel();
        self.task.await?
    }

    /// Wait for playback to end on its own (frame limit or callback error)
    pub async fn finished(self) -> Result<Player<S>> {
        let Self { cancel, task } = self;
        let result = task.await?;
        drop(cancel);
        result
    }
}
