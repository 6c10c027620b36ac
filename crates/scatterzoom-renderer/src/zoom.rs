//! Wheel/drag gesture handling and programmatic zoom animation.
//!
//! [`ZoomBehavior`] owns the current [`Transform`] of one plot. Every method
//! that changes it returns the new transform so the caller can rebuild its
//! scales and redraw; nothing here touches primitives directly.

use std::time::Duration;

use scatterzoom_core::{ScreenPoint, Transform, Viewport};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Wheel-delta tuning. The defaults feel right for a typical mouse wheel;
/// they are not invariants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSensitivity {
    pub pixel_unit: f64,
    pub line_unit: f64,
    pub page_unit: f64,
    pub multiplier: f64,
    /// Used instead of `multiplier` while ctrl is held (pinch on trackpads).
    pub ctrl_multiplier: f64,
}

impl Default for WheelSensitivity {
    fn default() -> Self {
        Self {
            pixel_unit: 0.002,
            line_unit: 0.05,
            page_unit: 1.0,
            multiplier: 5.0,
            ctrl_multiplier: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Lower bound for the zoom factor. Must be positive.
    pub min_scale: f64,
    /// Upper bound for the zoom factor; unbounded when `None`.
    pub max_scale: Option<f64>,
    pub wheel: WheelSensitivity,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.001,
            max_scale: None,
            wheel: WheelSensitivity::default(),
        }
    }
}

impl ZoomConfig {
    /// Clamp a requested zoom factor into the configured extent. Anything
    /// non-finite or non-positive collapses to the minimum.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        let min = if self.min_scale > 0.0 {
            self.min_scale
        } else {
            f64::MIN_POSITIVE
        };
        if !(scale > 0.0) {
            return min;
        }
        let scale = scale.max(min);
        match self.max_scale {
            Some(max) if max >= min => scale.min(max),
            _ => scale,
        }
    }
}

/// Unit of a wheel event's delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub delta_y: f64,
    pub mode: DeltaMode,
    pub ctrl_key: bool,
    /// Pointer position on the surface; stays fixed while zooming.
    pub position: ScreenPoint,
}

impl WheelEvent {
    pub fn new(delta_y: f64, position: ScreenPoint) -> Self {
        Self {
            delta_y,
            mode: DeltaMode::Pixel,
            ctrl_key: false,
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(ScreenPoint),
    Move(ScreenPoint),
    Up,
}

#[derive(Debug, Clone, Copy)]
struct ZoomTransition {
    from: Transform,
    target_scale: f64,
    anchor: ScreenPoint,
    start: Instant,
    duration: Duration,
}

impl ZoomTransition {
    /// Transform at `now`, and whether the transition has finished.
    fn sample(&self, now: Instant) -> (Transform, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        let scale = self.from.scale + (self.target_scale - self.from.scale) * progress;
        (self.from.zoom_about(scale, self.anchor), progress >= 1.0)
    }
}

/// Turns gestures and `scale_to` requests into transform updates.
#[derive(Debug, Clone)]
pub struct ZoomBehavior {
    config: ZoomConfig,
    viewport: Viewport,
    transform: Transform,
    drag_from: Option<ScreenPoint>,
    transition: Option<ZoomTransition>,
}

impl ZoomBehavior {
    pub fn new(viewport: Viewport, config: ZoomConfig) -> Self {
        Self {
            config,
            viewport,
            transform: Transform::IDENTITY,
            drag_from: None,
            transition: None,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Zoom-factor exponent for a wheel event: the new scale is
    /// `scale * 2^delta`.
    pub fn wheel_delta(&self, event: &WheelEvent) -> f64 {
        let w = &self.config.wheel;
        let unit = match event.mode {
            DeltaMode::Pixel => w.pixel_unit,
            DeltaMode::Line => w.line_unit,
            DeltaMode::Page => w.page_unit,
        };
        let multiplier = if event.ctrl_key {
            w.ctrl_multiplier
        } else {
            w.multiplier
        };
        -event.delta_y * unit * multiplier
    }

    /// Zoom about the pointer. Interrupts any running animation.
    pub fn wheel(&mut self, event: &WheelEvent) -> Transform {
        self.transition = None;
        let scale = self
            .config
            .clamp_scale(self.transform.scale * 2f64.powf(self.wheel_delta(event)));
        self.transform = self.transform.zoom_about(scale, event.position);
        self.transform
    }

    /// Drag to pan. Returns a transform only when the drag moved it.
    pub fn pointer(&mut self, event: &PointerEvent) -> Option<Transform> {
        match *event {
            PointerEvent::Down(at) => {
                self.transition = None;
                self.drag_from = Some(at);
                None
            }
            PointerEvent::Move(at) => {
                let from = self.drag_from.replace(at)?;
                self.transform.translate_x += at.x - from.x;
                self.transform.translate_y += at.y - from.y;
                Some(self.transform)
            }
            PointerEvent::Up => {
                self.drag_from = None;
                None
            }
        }
    }

    /// Replace the transform outright, clamping its scale.
    pub fn set_transform(&mut self, transform: Transform) -> Transform {
        self.transition = None;
        let scale = self.config.clamp_scale(transform.scale);
        self.transform = Transform { scale, ..transform };
        self.transform
    }

    /// Start animating the zoom factor linearly to `scale` over `duration`,
    /// keeping the viewport centre fixed. A zero duration applies at once and
    /// returns the new transform; otherwise frames pick it up via
    /// [`ZoomBehavior::advance`].
    pub fn scale_to(&mut self, scale: f64, duration: Duration, now: Instant) -> Option<Transform> {
        let target_scale = self.config.clamp_scale(scale);
        let anchor = self.viewport.center();
        if duration.is_zero() {
            self.transition = None;
            self.transform = self.transform.zoom_about(target_scale, anchor);
            return Some(self.transform);
        }
        self.transition = Some(ZoomTransition {
            from: self.transform,
            target_scale,
            anchor,
            start: now,
            duration,
        });
        None
    }

    /// Step a running animation to `now`.
    pub fn advance(&mut self, now: Instant) -> Option<Transform> {
        let transition = self.transition?;
        let (transform, done) = transition.sample(now);
        if done {
            self.transition = None;
        }
        self.transform = transform;
        Some(transform)
    }
}
