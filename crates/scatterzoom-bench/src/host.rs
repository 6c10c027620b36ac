//! Headless host: owns the container, swaps plots and drives the harness.

use std::collections::HashMap;
use std::rc::Rc;

use log::{info, warn};
use scatterzoom_core::{generate, Dataset};
use scatterzoom_renderer::{Container, PlotKind, ScatterPlot};
use tokio::task::{self, JoinHandle};
use uuid::Uuid;

use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::harness::{Harness, HarnessPhase};
use crate::report::{BenchReport, RunReport};

struct Installed {
    kind: PlotKind,
    points: usize,
    plot: Rc<ScatterPlot>,
    cycle: Option<JoinHandle<()>>,
}

/// Selects a plot kind and dataset size, tearing down whatever ran before.
///
/// Must be used inside a [`tokio::task::LocalSet`].
pub struct HostController {
    config: BenchConfig,
    container: Container,
    datasets: HashMap<usize, Dataset>,
    harness: Rc<Harness>,
    installed: Option<Installed>,
}

impl HostController {
    /// Empty host with its own container and harness.
    pub fn new(config: BenchConfig) -> Self {
        let harness = Rc::new(Harness::new(config.stress.clone()));
        Self {
            config,
            container: Container::new(),
            datasets: HashMap::new(),
            harness,
            installed: None,
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    fn dataset(&mut self, size: usize) -> Dataset {
        let bounds = self.config.bounds.with_count(size);
        self.datasets
            .entry(size)
            .or_insert_with(|| generate(&bounds))
            .clone()
    }

    /// Destroy the current plot, install `kind` with `size` points and start
    /// a stress cycle on it. Returns the new session id.
    pub fn select(&mut self, kind: PlotKind, size: usize) -> Result<Uuid, BenchError> {
        self.destroy();
        let session = self.harness.begin_session();
        let dataset = self.dataset(size);

        let sink = Rc::clone(&self.harness);
        let plot = match ScatterPlot::new(
            kind,
            dataset,
            self.config.width,
            self.config.height,
            &self.container,
            move |fps| sink.sample(session, fps),
            self.config.plot.clone(),
        ) {
            Ok(plot) => plot,
            Err(e) => {
                warn!("host: could not install {kind} plot: {e}");
                self.harness.end_session();
                return Err(e.into());
            }
        };
        info!("host: installed {kind} plot with {size} points");

        let plot = Rc::new(plot);
        let harness = Rc::clone(&self.harness);
        let target = Rc::clone(&plot);
        let cycle = task::spawn_local(async move {
            harness.run_cycle(session, &*target).await;
        });
        self.installed = Some(Installed {
            kind,
            points: size,
            plot,
            cycle: Some(cycle),
        });
        Ok(session)
    }

    /// Wait for the running stress cycle, if any, to finish.
    pub async fn wait_for_cycle(&mut self) {
        let Some(cycle) = self.installed.as_mut().and_then(|i| i.cycle.take()) else {
            return;
        };
        if let Err(e) = cycle.await {
            if !e.is_cancelled() {
                warn!("host: stress cycle failed: {e}");
            }
        }
    }

    /// Tear down the current plot. Safe to call when nothing is installed.
    pub fn destroy(&mut self) {
        if let Some(installed) = self.installed.take() {
            if let Some(cycle) = installed.cycle {
                cycle.abort();
            }
            installed.plot.destroy();
        }
        self.harness.end_session();
    }

    /// Destroy the plot and forget cached datasets.
    pub fn reset(&mut self) {
        self.destroy();
        self.datasets.clear();
    }

    /// The installed plot, if any.
    pub fn plot(&self) -> Option<&ScatterPlot> {
        self.installed.as_ref().map(|i| &*i.plot)
    }

    /// FPS of the installed plot, averaged over the sample window.
    pub fn fps(&self) -> Option<f64> {
        self.harness.fps()
    }

    /// Lowest windowed FPS recorded for the installed plot.
    pub fn min_fps(&self) -> Option<f64> {
        self.harness.min_fps()
    }

    pub fn phase(&self) -> HarnessPhase {
        self.harness.phase()
    }

    /// Snapshot of the installed plot's run.
    pub fn report(&self) -> Option<RunReport> {
        let installed = self.installed.as_ref()?;
        Some(RunReport {
            kind: installed.kind,
            points: installed.points,
            min_fps: self.harness.min_fps(),
            fps: self.harness.fps(),
            stats: installed.plot.frame_stats(),
        })
    }
}

impl Drop for HostController {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Run one stress cycle for every configured kind and size.
pub async fn run_benchmark(config: BenchConfig) -> Result<BenchReport, BenchError> {
    let mut report = BenchReport {
        width: config.width,
        height: config.height,
        runs: Vec::new(),
    };
    let sizes = config.sizes.clone();
    let kinds = config.kinds.clone();
    let mut host = HostController::new(config);
    for size in sizes {
        for kind in &kinds {
            host.select(*kind, size)?;
            host.wait_for_cycle().await;
            if let Some(run) = host.report() {
                info!(
                    "{kind} / {size} points: min fps {}",
                    run.min_fps.map_or_else(|| "n/a".to_string(), |f| format!("{f:.1}"))
                );
                report.runs.push(run);
            }
        }
    }
    host.destroy();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StressConfig;
    use scatterzoom_core::DatasetBounds;
    use tokio::task::LocalSet;

    fn config() -> BenchConfig {
        BenchConfig {
            stress: StressConfig {
                phase_duration_ms: 200,
                ..Default::default()
            },
            sizes: vec![200],
            bounds: DatasetBounds::default(),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_runs_a_cycle() {
        LocalSet::new()
            .run_until(async {
                let mut host = HostController::new(config());
                host.select(PlotKind::SharedTexture, 200).unwrap();
                assert!(host.container().mounted().is_some());
                host.wait_for_cycle().await;
                assert_eq!(host.phase(), HarnessPhase::Idle);
                assert!(host.min_fps().is_some());
                let run = host.report().unwrap();
                assert_eq!(run.fps, host.fps());
                assert_eq!(run.points, 200);
                assert_eq!(run.stats.primitives, 200);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_resets_minimum_and_caches_dataset() {
        LocalSet::new()
            .run_until(async {
                let mut host = HostController::new(config());
                let first = host.select(PlotKind::TranslateGraphics, 200).unwrap();
                host.wait_for_cycle().await;
                assert!(host.min_fps().is_some());
                let first_plot = host.plot().unwrap().id();

                let second = host.select(PlotKind::RedrawGraphics, 200).unwrap();
                assert_ne!(first, second);
                assert_eq!(host.min_fps(), None);
                assert_ne!(host.plot().unwrap().id(), first_plot);
                assert_eq!(host.datasets.len(), 1);
                assert!(host.container().mounted().is_some());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_viewport_installs_nothing() {
        LocalSet::new()
            .run_until(async {
                let mut host = HostController::new(BenchConfig {
                    width: 0.0,
                    ..config()
                });
                let err = host.select(PlotKind::SharedTexture, 10).unwrap_err();
                assert!(matches!(err, BenchError::Plot(_)));
                assert!(host.plot().is_none());
                assert!(host.container().is_empty());
                assert_eq!(host.phase(), HarnessPhase::Idle);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_benchmark_covers_every_kind() {
        let report = LocalSet::new()
            .run_until(run_benchmark(config()))
            .await
            .unwrap();
        assert_eq!(report.runs.len(), 4);
        assert!(report.runs.iter().all(|r| r.min_fps.is_some()));
        assert!(report.worst().is_some());
        assert!(report.to_json().unwrap().contains("\"runs\""));
    }
}
