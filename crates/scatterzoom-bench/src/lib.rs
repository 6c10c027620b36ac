//! # scatterzoom bench
//!
//! Drives every scatter plot kind through a scripted zoom-out / zoom-in
//! cycle and records the worst smoothed frame rate seen while zooming back
//! in.

pub mod config;
pub mod error;
pub mod fps;
pub mod harness;
pub mod host;
pub mod report;

pub use config::{BenchConfig, StressConfig, CONFIG_ENV};
pub use error::BenchError;
pub use fps::{FpsWindow, MinFpsRecorder};
pub use harness::{Harness, HarnessPhase, StressPhase, ZoomTarget};
pub use host::{run_benchmark, HostController};
pub use report::{BenchReport, RunReport};
