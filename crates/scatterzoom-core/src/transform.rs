use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::ScreenPoint;

/// The current pan/zoom state: `screen = base * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Uniform zoom factor. Must stay positive.
    pub scale: f64,
    /// Horizontal offset in screen pixels, applied after scaling.
    pub translate_x: f64,
    /// Vertical offset in screen pixels, applied after scaling.
    pub translate_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Build from a zoom factor and a post-zoom translation.
    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Pure translation at scale 1.
    pub fn translate(translate_x: f64, translate_y: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            ..Self::IDENTITY
        }
    }

    /// Check that the transform can be composed onto a scale.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.scale.is_finite() && self.scale > 0.0 {
            Ok(())
        } else {
            Err(CoreError::InvalidTransform { scale: self.scale })
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Map a base-space point to the screen: `p * k + t`.
    pub fn apply(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.apply_x(point.x), self.apply_y(point.y))
    }

    /// Horizontal component of [`Transform::apply`].
    pub fn apply_x(&self, x: f64) -> f64 {
        x * self.scale + self.translate_x
    }

    /// Vertical component of [`Transform::apply`].
    pub fn apply_y(&self, y: f64) -> f64 {
        y * self.scale + self.translate_y
    }

    /// Map a screen point back to base space: `(p - t) / k`.
    pub fn invert(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.invert_x(point.x), self.invert_y(point.y))
    }

    /// Horizontal component of [`Transform::invert`].
    pub fn invert_x(&self, x: f64) -> f64 {
        (x - self.translate_x) / self.scale
    }

    /// Vertical component of [`Transform::invert`].
    pub fn invert_y(&self, y: f64) -> f64 {
        (y - self.translate_y) / self.scale
    }

    /// Multiply the zoom factor, leaving the translation untouched.
    pub fn scaled_by(&self, factor: f64) -> Self {
        Self {
            scale: self.scale * factor,
            ..*self
        }
    }

    /// Translate by a delta expressed in pre-zoom units.
    pub fn translated_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            translate_x: self.translate_x + self.scale * dx,
            translate_y: self.translate_y + self.scale * dy,
            ..*self
        }
    }

    /// The transform `t` such that `t.apply(self.apply(p)) == p`.
    pub fn inverse(&self) -> Result<Self, CoreError> {
        self.validate()?;
        Ok(Self {
            scale: 1.0 / self.scale,
            translate_x: -self.translate_x / self.scale,
            translate_y: -self.translate_y / self.scale,
        })
    }

    /// Rescale to `scale` while keeping `anchor` (screen space) fixed.
    pub fn zoom_about(&self, scale: f64, anchor: ScreenPoint) -> Self {
        let local = self.invert(anchor);
        Self {
            scale,
            translate_x: anchor.x - local.x * scale,
            translate_y: anchor.y - local.y * scale,
        }
    }
}
