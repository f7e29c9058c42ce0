//! Draw-command recorder
//!
//! Captures every fill in device space with the alpha in effect, so frame
//! output can be inspected without rasterizing.

use cipherfeed_core::Color;
use glam::DVec2;

use crate::surface::{rect_corners, StateStack, Surface};

/// One recorded fill, in device coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A rectangle, possibly rotated; corners in winding order
    Rect {
        corners: [DVec2; 4],
        color: Color,
        alpha: f64,
    },
    Circle {
        center: DVec2,
        radius: f64,
        color: Color,
        alpha: f64,
    },
    Polygon {
        points: Vec<DVec2>,
        color: Color,
        alpha: f64,
    },
}

impl DrawCommand {
    pub fn color(&self) -> Color {
        match self {
            Self::Rect { color, .. } | Self::Circle { color, .. } | Self::Polygon { color, .. } => {
                *color
            }
        }
    }

    pub fn alpha(&self) -> f64 {
        match self {
            Self::Rect { alpha, .. } | Self::Circle { alpha, .. } | Self::Polygon { alpha, .. } => {
                *alpha
            }
        }
    }

    /// Centroid of the recorded shape
    pub fn center(&self) -> DVec2 {
        match self {
            Self::Rect { corners, .. } => corners.iter().copied().sum::<DVec2>() / 4.0,
            Self::Circle { center, .. } => *center,
            Self::Polygon { points, .. } => {
                points.iter().copied().sum::<DVec2>() / points.len().max(1) as f64
            }
        }
    }
}

/// A [`Surface`] that records instead of drawing
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    state: StateStack,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands, keep transform state
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Outstanding `save` calls
    pub fn state_depth(&self) -> usize {
        self.state.depth()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCommand::Rect {
            corners: rect_corners(&self.state, x, y, width, height),
            color,
            alpha: self.state.alpha(),
        });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center: self.state.map(DVec2::new(cx, cy)),
            radius,
            color,
            alpha: self.state.alpha(),
        });
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.iter().map(|p| self.state.map(*p)).collect(),
            color,
            alpha: self.state.alpha(),
        });
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
