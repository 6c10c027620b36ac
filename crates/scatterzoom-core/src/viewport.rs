use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::ScreenPoint;

/// Default culling margin in pixels, enough to cover the largest circle radius.
pub const DEFAULT_MARGIN: f64 = 10.0;

/// Pixel dimensions of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, CoreError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(CoreError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// Width and height rounded up to whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.ceil() as u32, self.height.ceil() as u32)
    }
}

/// Decides whether a screen-space position is worth drawing.
///
/// The viewport is grown by `margin` on every side, inclusive, so circles
/// whose centre sits just outside the edge are still drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityFilter {
    pub margin: f64,
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
        }
    }
}

impl VisibilityFilter {
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    pub fn is_visible(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        x >= -self.margin
            && x <= width + self.margin
            && y >= -self.margin
            && y <= height + self.margin
    }

    pub fn contains(&self, point: ScreenPoint, viewport: &Viewport) -> bool {
        self.is_visible(point.x, point.y, viewport.width, viewport.height)
    }
}
