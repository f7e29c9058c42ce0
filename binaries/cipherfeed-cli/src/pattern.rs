//! Pattern commands: encoding tables, still frames, animation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use cipherfeed_core::{get_all_emotions, get_visual_encoding, EmotionKey, VisualEncoding};
use cipherfeed_player::{PlaybackConfig, Player};
use cipherfeed_render::{
    render_frame, FrameLayout, PixelSurface, RenderParams, SvgSurface, GRID_SIZE,
};

/// Still-frame output, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            _ => anyhow::bail!(
                "Output must end in .png or .svg, got {}",
                path.display()
            ),
        }
    }
}

/// Render one frame of `encoding` to `path`
pub fn write_frame(
    encoding: &VisualEncoding,
    frame: u64,
    width: u32,
    height: u32,
    path: &Path,
) -> Result<()> {
    if width == 0 || height == 0 {
        anyhow::bail!("Width and height must be non-zero");
    }
    let params = RenderParams::new(encoding, frame);

    match OutputFormat::from_path(path)? {
        OutputFormat::Png => {
            let mut surface = PixelSurface::new(width, height);
            render_frame(&mut surface, width, height, &params);
            surface.save_png(path)?;
        }
        OutputFormat::Svg => {
            let mut surface = SvgSurface::new(width, height);
            render_frame(&mut surface, width, height, &params);
            surface.save(path)?;
        }
    }
    Ok(())
}

pub fn cmd_emotions() -> Result<()> {
    println!("\n  EMOTIONS\n");
    for emotion in get_all_emotions() {
        let encoding = get_visual_encoding(emotion);
        let palette: Vec<String> = encoding.color_palette.iter().map(|c| c.to_hex()).collect();
        println!(
            "  {:<8} {:<8} sym {}  speed {:<4} {}",
            emotion.as_str(),
            encoding.shape.as_str(),
            encoding.symmetry_level,
            encoding.movement_speed,
            palette.join(" ")
        );
    }
    Ok(())
}

pub fn cmd_encoding(emotion: EmotionKey, json: bool) -> Result<()> {
    let encoding = get_visual_encoding(emotion);
    if json {
        println!("{}", serde_json::to_string_pretty(&encoding)?);
        return Ok(());
    }

    println!("\n  {} ENCODING", emotion.label().to_uppercase());
    println!("  Shape:    {}", encoding.shape);
    println!("  Symmetry: {}", encoding.symmetry_level);
    println!("  Speed:    {}", encoding.movement_speed);
    println!("  Palette:");
    for (i, color) in encoding.color_palette.iter().enumerate() {
        println!("    [{}] {}", i, color.to_hex());
    }
    Ok(())
}

pub fn cmd_render(emotion: EmotionKey, output: &Path, frame: u64, width: u32, height: u32) -> Result<()> {
    let encoding = get_visual_encoding(emotion);
    write_frame(&encoding, frame, width, height, output)?;
    println!(
        "  {} frame {} ({}x{}) written to: {}",
        emotion.label(),
        frame,
        width,
        height,
        output.display()
    );
    Ok(())
}

pub fn cmd_inspect(emotion: EmotionKey, frame: u64, width: u32, height: u32) -> Result<()> {
    let encoding = get_visual_encoding(emotion);
    let layout = FrameLayout::new(&encoding, frame, width, height)
        .context("Nothing to draw for this size")?;

    println!("\n  {} frame {} ({}x{})", emotion.label(), frame, width, height);
    println!(
        "  phase {:.4}  cell {:.2}x{:.2}  base size {:.2}\n",
        layout.phase, layout.cell_width, layout.cell_height, layout.base_size
    );
    println!("  cell    drawn at  shape     size   color    alpha  rotation");
    for cell in layout.cells() {
        println!(
            "  ({},{})   ({},{})     {:<9} {:>6.2} {}  {:.3}  {:.3}",
            cell.row,
            cell.col,
            cell.final_row,
            cell.final_col,
            format!("{:?}", cell.primitive),
            cell.size,
            encoding.color_palette[cell.color_index].to_hex(),
            cell.alpha,
            cell.rotation
        );
    }
    println!("\n  {} cells", GRID_SIZE * GRID_SIZE);
    Ok(())
}

pub async fn cmd_animate(
    emotion: EmotionKey,
    frames: u64,
    out_dir: PathBuf,
    fps: u32,
    width: u32,
    height: u32,
) -> Result<()> {
    if width == 0 || height == 0 {
        anyhow::bail!("Width and height must be non-zero");
    }
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Creating {}", out_dir.display()))?;

    let player = Player::new(
        get_visual_encoding(emotion),
        PixelSurface::new(width, height),
        width,
        height,
    );
    let dir = out_dir.clone();
    let handle = player.spawn(
        PlaybackConfig::new(fps).with_frame_limit(frames),
        move |frame, surface: &PixelSurface| {
            surface.save_png(dir.join(format!("frame_{:05}.png", frame)))?;
            Ok(())
        },
    )?;

    let signal = handle.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping playback");
            signal.cancel();
        }
    });

    tracing::info!("Animating {} at {} fps", emotion, fps);
    let player = handle.finished().await?;
    println!(
        "  {} frames of {} written to: {}",
        player.frame_index(),
        emotion.label(),
        out_dir.display()
    );
    Ok(())
}
