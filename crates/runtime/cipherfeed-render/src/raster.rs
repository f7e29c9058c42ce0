//! Software raster surface
//!
//! Scanline fills sampled at pixel centers, src-over blending with the
//! global alpha. No anti-aliasing, so output is bit-exact across runs.

use std::path::Path;

use cipherfeed_core::Color;
use glam::DVec2;
use image::{Rgba, RgbaImage};

use crate::surface::{rect_corners, StateStack, Surface};

/// An RGBA pixel buffer implementing [`Surface`]
#[derive(Debug, Clone)]
pub struct PixelSurface {
    image: RgbaImage,
    state: StateStack,
}

impl PixelSurface {
    /// Transparent black surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            state: StateStack::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Raw row-major RGBA bytes
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Outstanding `save` calls
    pub fn state_depth(&self) -> usize {
        self.state.depth()
    }

    /// Write the buffer as PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        tracing::debug!("Wrote {}x{} PNG to {}", self.width(), self.height(), path.display());
        Ok(())
    }

    /// Rows whose pixel centers fall in `[min_y, max_y)`
    fn row_range(&self, min_y: f64, max_y: f64) -> std::ops::Range<u32> {
        clamp_span(min_y, max_y, self.image.height())
    }

    /// Blend a horizontal run of pixel centers in `[x0, x1)` on row `y`
    fn fill_span(&mut self, y: u32, x0: f64, x1: f64, color: Color, alpha: f64) {
        for x in clamp_span(x0, x1, self.image.width()) {
            let pixel = self.image.get_pixel_mut(x, y);
            *pixel = blend(*pixel, color, alpha);
        }
    }

    fn fill_device_polygon(&mut self, points: &[DVec2], color: Color, alpha: f64) {
        if points.len() < 3 || alpha <= 0.0 {
            return;
        }

        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

        let mut crossings = Vec::with_capacity(points.len());
        for y in self.row_range(min_y, max_y) {
            let yc = f64::from(y) + 0.5;
            crossings.clear();

            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= yc && b.y > yc) || (b.y <= yc && a.y > yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f64::total_cmp);

            for pair in crossings.chunks_exact(2) {
                self.fill_span(y, pair[0], pair[1], color, alpha);
            }
        }
    }
}

impl Surface for PixelSurface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let corners = rect_corners(&self.state, x, y, width, height);
        let alpha = self.state.alpha();
        self.fill_device_polygon(&corners, color, alpha);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let alpha = self.state.alpha();
        if radius <= 0.0 || alpha <= 0.0 {
            return;
        }

        let center = self.state.map(DVec2::new(cx, cy));
        for y in self.row_range(center.y - radius, center.y + radius) {
            let dy = f64::from(y) + 0.5 - center.y;
            let reach = radius * radius - dy * dy;
            if reach < 0.0 {
                continue;
            }
            let dx = reach.sqrt();
            self.fill_span(y, center.x - dx, center.x + dx, color, alpha);
        }
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        let mapped: Vec<DVec2> = points.iter().map(|p| self.state.map(*p)).collect();
        let alpha = self.state.alpha();
        self.fill_device_polygon(&mapped, color, alpha);
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rotate(radians);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.set_alpha(alpha);
    }

    fn global_alpha(&self) -> f64 {
        self.state.alpha()
    }
}

/// Pixel indices whose centers lie in `[lo, hi)`, clipped to `[0, limit)`
fn clamp_span(lo: f64, hi: f64, limit: u32) -> std::ops::Range<u32> {
    if lo.is_nan() || hi.is_nan() || lo >= hi {
        return 0..0;
    }
    let limit_f = f64::from(limit);
    let start = (lo - 0.5).ceil().clamp(0.0, limit_f) as u32;
    let end = (hi - 0.5).ceil().clamp(0.0, limit_f) as u32;
    start..end.max(start)
}

/// Source-over compositing of an opaque color at `alpha`
fn blend(dst: Rgba<u8>, color: Color, alpha: f64) -> Rgba<u8> {
    let alpha = alpha.clamp(0.0, 1.0);
    let [dr, dg, db, da] = dst.0;
    let dst_alpha = f64::from(da) / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mix = |src: u8, dst: u8| -> u8 {
        let value = (f64::from(src) * alpha + f64::from(dst) * dst_alpha * (1.0 - alpha)) / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        mix(color.r, dr),
        mix(color.g, dg),
        mix(color.b, db),
        (out_alpha * 255.0).round() as u8,
    ])
}
