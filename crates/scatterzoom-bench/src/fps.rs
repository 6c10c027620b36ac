//! Frame-rate smoothing and worst-case tracking.

use std::collections::VecDeque;

pub const DEFAULT_WINDOW: usize = 5;

/// The most recent `capacity` FPS samples.
#[derive(Debug, Clone)]
pub struct FpsWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for FpsWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl FpsWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a sample, evicting the oldest when full, and return the new average.
    pub fn push(&mut self, fps: f64) -> f64 {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(fps);
        self.average().unwrap_or(fps)
    }

    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Smooths every sample through an [`FpsWindow`] and, while recording,
/// keeps the lowest average seen.
#[derive(Debug, Clone, Default)]
pub struct MinFpsRecorder {
    window: FpsWindow,
    recording: bool,
    minimum: Option<f64>,
    last: Option<f64>,
}

impl MinFpsRecorder {
    pub fn new(window: usize) -> Self {
        Self {
            window: FpsWindow::new(window),
            ..Default::default()
        }
    }

    /// Push a raw sample through the window, updating the minimum while recording.
    pub fn record(&mut self, fps: f64) {
        self.last = Some(fps);
        let average = self.window.push(fps);
        if !self.recording {
            return;
        }
        match self.minimum {
            Some(min) if min <= average => {}
            _ => self.minimum = Some(average),
        }
    }

    pub fn start(&mut self) {
        self.recording = true;
    }

    pub fn stop(&mut self) {
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Lowest smoothed FPS while recording; `None` if recording never saw a
    /// sample.
    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    /// Latest instantaneous sample.
    pub fn last(&self) -> Option<f64> {
        self.last
    }

    /// Current window average.
    pub fn average(&self) -> Option<f64> {
        self.window.average()
    }

    /// Forget everything, ready for a new plot.
    pub fn reset(&mut self) {
        self.window.clear();
        self.recording = false;
        self.minimum = None;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted() -> Vec<(f64, bool)> {
        let mut stream = Vec::new();
        stream.extend([(60.0, false); 5]);
        stream.extend([(10.0, true); 5]);
        stream.extend([(60.0, false); 5]);
        stream
    }

    #[test]
    fn test_window_keeps_last_five() {
        let mut w = FpsWindow::default();
        for fps in [100.0, 10.0, 10.0, 10.0, 10.0, 10.0] {
            w.push(fps);
        }
        assert_eq!(w.len(), 5);
        assert_eq!(w.average(), Some(10.0));
    }

    #[test]
    fn test_scripted_stream_records_ten() {
        let mut r = MinFpsRecorder::new(5);
        for (fps, recording) in scripted() {
            if recording {
                r.start();
            } else {
                r.stop();
            }
            r.record(fps);
        }
        assert_eq!(r.minimum(), Some(10.0));
    }

    #[test]
    fn test_minimum_stays_none_without_recording() {
        let mut r = MinFpsRecorder::new(5);
        for (fps, _) in scripted() {
            r.record(fps);
        }
        assert_eq!(r.minimum(), None);
        assert_eq!(r.last(), Some(60.0));
    }

    #[test]
    fn test_minimum_only_decreases() {
        let mut r = MinFpsRecorder::new(1);
        r.start();
        r.record(30.0);
        r.record(45.0);
        assert_eq!(r.minimum(), Some(30.0));
        r.record(20.0);
        assert_eq!(r.minimum(), Some(20.0));
    }

    #[test]
    fn test_reset_clears_window_and_minimum() {
        let mut r = MinFpsRecorder::new(5);
        r.start();
        r.record(5.0);
        r.reset();
        assert!(!r.is_recording());
        assert_eq!(r.minimum(), None);
        assert_eq!(r.average(), None);
    }
}
