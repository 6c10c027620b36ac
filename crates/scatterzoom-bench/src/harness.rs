//! The scripted zoom-out / zoom-in stress cycle.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use log::{debug, info};
use scatterzoom_renderer::ScatterPlot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::StressConfig;
use crate::fps::MinFpsRecorder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressPhase {
    ZoomOut,
    ZoomIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HarnessPhase {
    #[default]
    Idle,
    Stressing(StressPhase),
}

impl fmt::Display for HarnessPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessPhase::Idle => f.write_str("idle"),
            HarnessPhase::Stressing(StressPhase::ZoomOut) => f.write_str("zooming out"),
            HarnessPhase::Stressing(StressPhase::ZoomIn) => f.write_str("zooming in"),
        }
    }
}

/// Anything the harness can drive through a timed zoom.
pub trait ZoomTarget {
    fn zoom_to(&self, factor: f64, duration: Duration) -> Pin<Box<dyn Future<Output = ()>>>;
}

impl ZoomTarget for ScatterPlot {
    fn zoom_to(&self, factor: f64, duration: Duration) -> Pin<Box<dyn Future<Output = ()>>> {
        Box::pin(self.scale_to(factor, Some(duration)))
    }
}

/// Runs stress cycles and tracks the smoothed minimum FPS for one plot at a
/// time.
///
/// Each installed plot gets a session id; FPS samples tagged with any other
/// session are dropped, so a plot being torn down cannot leak into the next
/// run.
#[derive(Debug)]
pub struct Harness {
    config: StressConfig,
    phase: Cell<HarnessPhase>,
    session: Cell<Option<Uuid>>,
    recorder: RefCell<MinFpsRecorder>,
}

impl Harness {
    pub fn new(config: StressConfig) -> Self {
        let recorder = MinFpsRecorder::new(config.window);
        Self {
            config,
            phase: Cell::new(HarnessPhase::Idle),
            session: Cell::new(None),
            recorder: RefCell::new(recorder),
        }
    }

    pub fn config(&self) -> &StressConfig {
        &self.config
    }

    /// Start a fresh session: window and minimum are cleared and the phase
    /// returns to idle.
    pub fn begin_session(&self) -> Uuid {
        let session = Uuid::new_v4();
        self.session.set(Some(session));
        self.recorder.borrow_mut().reset();
        self.phase.set(HarnessPhase::Idle);
        debug!("harness: session {session} started");
        session
    }

    /// Close the current session; later samples are ignored.
    pub fn end_session(&self) {
        self.session.set(None);
        self.recorder.borrow_mut().stop();
        self.phase.set(HarnessPhase::Idle);
    }

    /// The session whose samples are currently accepted.
    pub fn session(&self) -> Option<Uuid> {
        self.session.get()
    }

    /// Feed one FPS sample; ignored unless `session` is current.
    pub fn sample(&self, session: Uuid, fps: f64) {
        if self.session.get() != Some(session) {
            return;
        }
        self.recorder.borrow_mut().record(fps);
    }

    /// Current stress phase.
    pub fn phase(&self) -> HarnessPhase {
        self.phase.get()
    }

    /// Lowest windowed FPS seen while recording.
    pub fn min_fps(&self) -> Option<f64> {
        self.recorder.borrow().minimum()
    }

    /// FPS averaged over the sample window.
    pub fn fps(&self) -> Option<f64> {
        self.recorder.borrow().average()
    }

    /// Latest raw sample, before smoothing.
    pub fn last_fps(&self) -> Option<f64> {
        self.recorder.borrow().last()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.borrow().is_recording()
    }

    /// Zoom far out, then record while zooming back in. Returns early if
    /// `session` is replaced while a phase is in flight.
    pub async fn run_cycle(&self, session: Uuid, target: &dyn ZoomTarget) {
        let duration = self.config.phase_duration();
        for cycle in 0..self.config.cycles {
            if !self.enter(session, HarnessPhase::Stressing(StressPhase::ZoomOut)) {
                return;
            }
            target.zoom_to(self.config.zoom_out, duration).await;

            if !self.enter(session, HarnessPhase::Stressing(StressPhase::ZoomIn)) {
                return;
            }
            self.recorder.borrow_mut().start();
            target.zoom_to(self.config.zoom_in, duration).await;
            if self.session.get() != Some(session) {
                return;
            }
            self.recorder.borrow_mut().stop();
            debug!("harness: cycle {} done, min fps {:?}", cycle + 1, self.min_fps());
        }
        self.enter(session, HarnessPhase::Idle);
    }

    fn enter(&self, session: Uuid, phase: HarnessPhase) -> bool {
        if self.session.get() != Some(session) {
            debug!("harness: session {session} superseded");
            return false;
        }
        if self.phase.replace(phase) != phase {
            info!("harness: {phase}");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use tokio::time::{self, Instant};

    /// Records calls and feeds canned FPS samples into the harness while
    /// "zooming".
    struct ScriptedTarget {
        harness: Rc<Harness>,
        session: Uuid,
        calls: RefCell<Vec<(f64, Duration)>>,
    }

    impl ZoomTarget for ScriptedTarget {
        fn zoom_to(&self, factor: f64, duration: Duration) -> Pin<Box<dyn Future<Output = ()>>> {
            self.calls.borrow_mut().push((factor, duration));
            let harness = Rc::clone(&self.harness);
            let session = self.session;
            let fps = if factor < 1.0 { 60.0 } else { 10.0 };
            Box::pin(async move {
                for _ in 0..5 {
                    harness.sample(session, fps);
                }
                time::sleep(duration).await;
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_sequence_and_minimum() {
        let harness = Rc::new(Harness::new(StressConfig::default()));
        let session = harness.begin_session();
        let target = ScriptedTarget {
            harness: Rc::clone(&harness),
            session,
            calls: RefCell::new(Vec::new()),
        };

        let start = Instant::now();
        harness.run_cycle(session, &target).await;
        assert!(start.elapsed() >= Duration::from_millis(3000));
        assert_eq!(
            *target.calls.borrow(),
            vec![
                (0.05, Duration::from_millis(1500)),
                (1.0, Duration::from_millis(1500))
            ]
        );
        assert_eq!(harness.min_fps(), Some(10.0));
        assert_eq!(harness.phase(), HarnessPhase::Idle);
        assert!(!harness.is_recording());
    }

    #[test]
    fn test_stale_samples_are_dropped() {
        let harness = Harness::new(StressConfig::default());
        let old = harness.begin_session();
        harness.sample(old, 30.0);
        let new = harness.begin_session();
        harness.sample(old, 1.0);
        assert_eq!(harness.fps(), None);
        harness.sample(new, 50.0);
        assert_eq!(harness.fps(), Some(50.0));
    }

    #[test]
    fn test_fps_is_window_average() {
        let harness = Harness::new(StressConfig::default());
        let session = harness.begin_session();
        for fps in [60.0, 60.0, 60.0, 60.0, 10.0] {
            harness.sample(session, fps);
        }
        assert_eq!(harness.fps(), Some(50.0));
        assert_eq!(harness.last_fps(), Some(10.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_cycle_stops() {
        let harness = Rc::new(Harness::new(StressConfig::default()));
        let old = harness.begin_session();
        let target = ScriptedTarget {
            harness: Rc::clone(&harness),
            session: old,
            calls: RefCell::new(Vec::new()),
        };
        let cycle = harness.run_cycle(old, &target);
        let switch = async {
            time::sleep(Duration::from_millis(100)).await;
            harness.begin_session();
        };
        tokio::join!(cycle, switch);
        assert_eq!(target.calls.borrow().len(), 1);
        assert_eq!(harness.phase(), HarnessPhase::Idle);
        assert_eq!(harness.min_fps(), None);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(
            HarnessPhase::Stressing(StressPhase::ZoomOut).to_string(),
            "zooming out"
        );
        assert_eq!(HarnessPhase::default(), HarnessPhase::Idle);
    }
}
