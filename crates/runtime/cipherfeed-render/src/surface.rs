//! Drawing surface abstraction
//!
//! Immediate-mode, canvas-style: fills take the current transform and
//! global alpha; `save`/`restore` push and pop both.

use cipherfeed_core::Color;
use glam::{DAffine2, DVec2};

/// A 2D immediate-mode drawing target.
///
/// Transforms are rigid (translate + rotate), so circle radii are never
/// scaled.
pub trait Surface {
    /// Fill an axis-aligned rectangle given in local coordinates
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Fill a disc given in local coordinates
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color);

    /// Fill a closed polygon given in local coordinates
    fn fill_polygon(&mut self, points: &[DVec2], color: Color);

    /// Push transform and global alpha
    fn save(&mut self);

    /// Pop transform and global alpha. No-op on an empty stack.
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);

    fn rotate(&mut self, radians: f64);

    /// Values outside `[0, 1]` (or NaN) are ignored
    fn set_global_alpha(&mut self, alpha: f64);

    fn global_alpha(&self) -> f64;
}

/// Transform and alpha in effect for a fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub transform: DAffine2,
    pub alpha: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: DAffine2::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// Save/restore stack shared by the bundled surfaces
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> DrawState {
        self.current
    }

    /// Number of outstanding `save` calls
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current.transform =
            self.current.transform * DAffine2::from_translation(DVec2::new(dx, dy));
    }

    pub fn rotate(&mut self, radians: f64) {
        self.current.transform = self.current.transform * DAffine2::from_angle(radians);
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        if (0.0..=1.0).contains(&alpha) {
            self.current.alpha = alpha;
        }
    }

    pub fn alpha(&self) -> f64 {
        self.current.alpha
    }

    /// Map a local point to device space
    pub fn map(&self, point: DVec2) -> DVec2 {
        self.current.transform.transform_point2(point)
    }

    /// True when no translate/rotate is in effect
    pub fn is_identity(&self) -> bool {
        self.current.transform == DAffine2::IDENTITY
    }
}

/// Corners of a local rect, mapped to device space, in winding order
pub(crate) fn rect_corners(state: &StateStack, x: f64, y: f64, w: f64, h: f64) -> [DVec2; 4] {
    [
        state.map(DVec2::new(x, y)),
        state.map(DVec2::new(x + w, y)),
        state.map(DVec2::new(x + w, y + h)),
        state.map(DVec2::new(x, y + h)),
    ]
}
