use scatterzoom_renderer::{FrameStats, PlotKind};
use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// Outcome of one stress cycle for one plot kind and dataset size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub kind: PlotKind,
    pub points: usize,
    /// Lowest 5-sample average while zooming back in.
    pub min_fps: Option<f64>,
    /// Windowed FPS when the report was taken.
    pub fps: Option<f64>,
    pub stats: FrameStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    pub width: f64,
    pub height: f64,
    pub runs: Vec<RunReport>,
}

impl BenchReport {
    pub fn to_json(&self) -> Result<String, BenchError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The run with the lowest recorded minimum, if any run recorded one.
    pub fn worst(&self) -> Option<&RunReport> {
        self.runs
            .iter()
            .filter(|r| r.min_fps.is_some())
            .min_by(|a, b| a.min_fps.partial_cmp(&b.min_fps).unwrap_or(std::cmp::Ordering::Equal))
    }
}
