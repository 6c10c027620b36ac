use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_TARGET_FPS: f64 = 60.0;

/// Frame gaps longer than this are clamped, so a stall reads as 10 FPS.
const MIN_FPS: f64 = 10.0;

/// Per-frame clock reporting the instantaneous frame rate.
#[derive(Debug, Clone)]
pub struct Ticker {
    target_fps: f64,
    last_tick: Option<Instant>,
    fps: f64,
}

impl Ticker {
    pub fn new(target_fps: f64) -> Self {
        let target_fps = if target_fps.is_finite() && target_fps >= 1.0 {
            target_fps
        } else {
            DEFAULT_TARGET_FPS
        };
        Self {
            target_fps,
            last_tick: None,
            fps: target_fps,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps)
    }

    /// Record a frame at `now` and return the frame rate implied by the gap
    /// since the previous frame. The first frame reports the target rate.
    pub fn tick(&mut self, now: Instant) -> f64 {
        if let Some(last) = self.last_tick {
            let elapsed_ms = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
            if elapsed_ms > 0.0 {
                self.fps = 1000.0 / elapsed_ms.min(1000.0 / MIN_FPS);
            }
        }
        self.last_tick = Some(now);
        self.fps
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS)
    }
}
