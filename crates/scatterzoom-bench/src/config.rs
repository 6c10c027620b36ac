use std::fs;
use std::path::Path;
use std::time::Duration;

use scatterzoom_core::DatasetBounds;
use scatterzoom_renderer::{PlotKind, PlotOptions};
use serde::{Deserialize, Serialize};

use crate::error::BenchError;
use crate::fps::DEFAULT_WINDOW;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "SCATTERZOOM_CONFIG";

/// The scripted zoom cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// Zoom factor reached in the first phase.
    pub zoom_out: f64,
    /// Zoom factor returned to while recording.
    pub zoom_in: f64,
    pub phase_duration_ms: u64,
    /// Samples averaged before comparing against the minimum.
    pub window: usize,
    /// Out/in cycles per selection.
    pub cycles: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            zoom_out: 0.05,
            zoom_in: 1.0,
            phase_duration_ms: 1500,
            window: DEFAULT_WINDOW,
            cycles: 1,
        }
    }
}

impl StressConfig {
    pub fn phase_duration(&self) -> Duration {
        Duration::from_millis(self.phase_duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub stress: StressConfig,
    /// Dataset sizes to run, in order.
    pub sizes: Vec<usize>,
    pub kinds: Vec<PlotKind>,
    /// Generator bounds; `count` is overridden by each size.
    pub bounds: DatasetBounds,
    pub width: f64,
    pub height: f64,
    pub plot: PlotOptions,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            stress: StressConfig::default(),
            sizes: vec![16_000, 64_000, 128_000],
            kinds: PlotKind::ALL.to_vec(),
            bounds: DatasetBounds::default(),
            width: 400.0,
            height: 300.0,
            plot: PlotOptions::default(),
        }
    }
}

impl BenchConfig {
    pub fn from_json(json: &str) -> Result<Self, BenchError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BenchError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from [`CONFIG_ENV`] if it is set, defaults otherwise.
    pub fn from_env() -> Result<Self, BenchError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
