//! SVG surface
//!
//! Builds a static SVG document of one frame. Transforms are baked into
//! the emitted coordinates.

use std::path::Path;

use cipherfeed_core::Color;
use glam::DVec2;

use crate::surface::{rect_corners, StateStack, Surface};

/// A [`Surface`] that accumulates SVG elements
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: u32,
    height: u32,
    elements: Vec<String>,
    state: StateStack,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            state: StateStack::new(),
        }
    }

    /// Number of shape elements in the document
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Render the document
    pub fn to_svg(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">
{body}
</svg>"#,
            w = self.width,
            h = self.height,
            body = self.elements.join("\n"),
        )
    }

    /// Write the document to disk
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_svg())?;
        tracing::debug!("Wrote SVG with {} elements to {}", self.elements.len(), path.display());
        Ok(())
    }

    /// An opaque untransformed fill over the whole viewport hides
    /// everything drawn before it.
    fn covers_viewport(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        self.state.is_identity()
            && self.state.alpha() >= 1.0
            && x <= 0.0
            && y <= 0.0
            && x + width >= f64::from(self.width)
            && y + height >= f64::from(self.height)
    }

    fn push_polygon(&mut self, points: &[DVec2], color: Color) {
        let points = points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let element = format!(
            r#"  <polygon points="{}" fill="{}"{}/>"#,
            points,
            color.to_hex(),
            opacity_attr(self.state.alpha())
        );
        self.elements.push(element);
    }
}

fn opacity_attr(alpha: f64) -> String {
    if alpha >= 1.0 {
        String::new()
    } else {
        format!(r#" fill-opacity="{:.3}""#, alpha)
    }
}

impl Surface for SvgSurface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        if self.covers_viewport(x, y, width, height) {
            self.elements.clear();
        }

        if self.state.is_identity() {
            let element = format!(
                r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"{}/>"#,
                x,
                y,
                width,
                height,
                color.to_hex(),
                opacity_attr(self.state.alpha())
            );
            self.elements.push(element);
        } else {
            let corners = rect_corners(&self.state, x, y, width, height);
            self.push_polygon(&corners, color);
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let center = self.state.map(DVec2::new(cx, cy));
        let element = format!(
            r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"{}/>"#,
            center.x,
            center.y,
            radius,
            color.to_hex(),
            opacity_attr(self.state.alpha())
        );
        self.elements.push(element);
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        let mapped: Vec<DVec2> = points.iter().map(|p| self.state.map(*p)).collect();
        self.push_polygon(&mapped, color);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{render_frame, RenderParams, GRID_SIZE};
    use cipherfeed_core::{get_visual_encoding, EmotionKey};

    fn render(emotion: EmotionKey, frame: u64) -> SvgSurface {
        let encoding = get_visual_encoding(emotion);
        let mut surface = SvgSurface::new(400, 400);
        render_frame(&mut surface, 400, 400, &RenderParams::new(&encoding, frame));
        surface
    }

    #[test]
    fn test_render_svg() {
        let svg = render(EmotionKey::Joy, 0).to_svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 400 400""#));
        assert!(svg.contains(r##"fill="#0A0A0A""##));
        assert_eq!(svg.matches("<circle").count(), GRID_SIZE * GRID_SIZE);
    }

    #[test]
    fn test_trust_mixes_elements() {
        let svg = render(EmotionKey::Trust, 0).to_svg();
        // 21 circles, 22 squares, 21 triangles over the 8×8 grid
        assert_eq!(svg.matches("<circle").count(), 21);
        // squares are emitted as rotated polygons
        assert_eq!(svg.matches("<polygon").count(), 43);
    }

    #[test]
    fn test_redraw_replaces_previous_frame() {
        let encoding = get_visual_encoding(EmotionKey::Fear);
        let mut surface = SvgSurface::new(400, 400);
        render_frame(&mut surface, 400, 400, &RenderParams::new(&encoding, 0));
        render_frame(&mut surface, 400, 400, &RenderParams::new(&encoding, 1));

        assert_eq!(surface.element_count(), 1 + GRID_SIZE * GRID_SIZE);
        assert_eq!(surface.to_svg(), render(EmotionKey::Fear, 1).to_svg());
    }

    #[test]
    fn test_different_emotions_different_svg() {
        assert_ne!(
            render(EmotionKey::Calm, 0).to_svg(),
            render(EmotionKey::Urgency, 0).to_svg()
        );
    }

    #[test]
    fn test_opacity_only_when_translucent() {
        let mut surface = SvgSurface::new(10, 10);
        surface.fill_circle(5.0, 5.0, 2.0, Color::WHITE);
        surface.set_global_alpha(0.5);
        surface.fill_circle(5.0, 5.0, 2.0, Color::WHITE);

        let svg = surface.to_svg();
        assert_eq!(svg.matches("fill-opacity").count(), 1);
        assert!(svg.contains(r#"fill-opacity="0.500""#));
    }
}
