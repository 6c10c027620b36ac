//! The scatter plot handle: one surface, one strategy, one zoom behavior and
//! a frame loop running as a local task.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::ops::Range;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, warn};
use scatterzoom_core::{Dataset, LinearScale, Transform, Viewport, VisibilityFilter};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::error::PlotError;
use crate::framebuffer::Framebuffer;
use crate::render_data::FrameStats;
use crate::strategy::{self, RedrawContext, Strategy};
use crate::surface::{Container, Surface};
use crate::ticker::{Ticker, DEFAULT_TARGET_FPS};
use crate::zoom::{PointerEvent, WheelEvent, ZoomBehavior, ZoomConfig};

/// Which rendering strategy a plot uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotKind {
    SharedTexture,
    UniqueTexture,
    TranslateGraphics,
    RedrawGraphics,
}

impl PlotKind {
    pub const ALL: [PlotKind; 4] = [
        PlotKind::SharedTexture,
        PlotKind::UniqueTexture,
        PlotKind::TranslateGraphics,
        PlotKind::RedrawGraphics,
    ];

    /// Human-readable name used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            PlotKind::SharedTexture => "shared texture",
            PlotKind::UniqueTexture => "unique texture",
            PlotKind::TranslateGraphics => "translate graphics",
            PlotKind::RedrawGraphics => "redraw graphics",
        }
    }

    /// Whether primitives are allocated in chunks on a background task
    /// instead of inside the constructor.
    pub fn chunked_setup(&self) -> bool {
        matches!(self, PlotKind::UniqueTexture)
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Culling margin around the viewport.
    pub visibility: VisibilityFilter,
    /// Scale limits and wheel sensitivity.
    pub zoom: ZoomConfig,
    /// Frame loop rate.
    pub target_fps: f64,
    /// Data-to-pixel mapping at rest, one per axis.
    pub base_x: LinearScale,
    pub base_y: LinearScale,
    /// Points allocated between yields during chunked setup.
    pub allocation_chunk: usize,
    /// Used by `scale_to` when no duration is given.
    pub default_duration_ms: u64,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            visibility: VisibilityFilter::default(),
            zoom: ZoomConfig::default(),
            target_fps: DEFAULT_TARGET_FPS,
            base_x: LinearScale::identity(),
            base_y: LinearScale::identity(),
            allocation_chunk: 1000,
            default_duration_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Initializing,
    Ready,
    Destroyed,
}

struct PlotState {
    id: Uuid,
    kind: PlotKind,
    lifecycle: Lifecycle,
    status: watch::Sender<Lifecycle>,
    destroy_requested: bool,
    dataset: Dataset,
    surface: Option<Surface>,
    strategy: Box<dyn Strategy>,
    zoom: ZoomBehavior,
    filter: VisibilityFilter,
    base_x: LinearScale,
    base_y: LinearScale,
    ticker: Ticker,
    frames: u64,
    last_fps: Option<f64>,
    default_duration: Duration,
}

impl PlotState {
    fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
        self.status.send_replace(lifecycle);
    }

    fn allocate(&mut self, range: Range<usize>) {
        let PlotState {
            dataset,
            surface,
            strategy,
            ..
        } = self;
        let Some(surface) = surface.as_mut() else {
            return;
        };
        for point in &dataset[range] {
            strategy.allocate(surface, point);
        }
    }

    /// Draw the identity transform and start accepting work.
    fn finish_setup(&mut self) {
        let transform = self.zoom.transform();
        self.apply_transform(transform);
        self.set_lifecycle(Lifecycle::Ready);
        debug!(
            "plot {}: {} ready with {} points",
            self.id,
            self.kind,
            self.dataset.len()
        );
    }

    /// Rebuild both scales from `transform` and let the strategy catch up.
    fn apply_transform(&mut self, transform: Transform) {
        let scales = self
            .base_x
            .rescale_x(&transform)
            .and_then(|x| Ok((x, self.base_y.rescale_y(&transform)?)));
        let (x, y) = match scales {
            Ok(scales) => scales,
            Err(e) => {
                warn!("plot {}: skipping redraw: {e}", self.id);
                return;
            }
        };
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let ctx = RedrawContext {
            dataset: &self.dataset,
            x: &x,
            y: &y,
            filter: self.filter,
            viewport: surface.viewport(),
        };
        self.strategy.redraw(surface, &ctx);
    }

    /// Advance any animation, rasterize, and return this frame's FPS sample.
    fn frame(&mut self, now: Instant) -> Option<f64> {
        if self.lifecycle != Lifecycle::Ready {
            return None;
        }
        if let Some(transform) = self.zoom.advance(now) {
            self.apply_transform(transform);
        }
        self.surface.as_mut()?.render();
        let fps = self.ticker.tick(now);
        self.frames += 1;
        self.last_fps = Some(fps);
        Some(fps)
    }

    fn teardown(&mut self) {
        self.surface = None;
        self.strategy = strategy::for_kind(self.kind);
        self.dataset = Dataset::empty();
        self.set_lifecycle(Lifecycle::Destroyed);
        debug!("plot {}: destroyed", self.id);
    }
}

type SharedState = Rc<RefCell<PlotState>>;

/// A running scatter plot mounted in a [`Container`].
///
/// Must be created inside a [`tokio::task::LocalSet`]; the frame loop and any
/// chunked setup run as local tasks on it.
pub struct ScatterPlot {
    id: Uuid,
    kind: PlotKind,
    state: SharedState,
    task: JoinHandle<()>,
}

impl ScatterPlot {
    /// Validate the viewport, mount a fresh surface in `container` and start
    /// allocating primitives. `fps` receives one sample per rendered frame.
    pub fn new<F>(
        kind: PlotKind,
        dataset: Dataset,
        width: f64,
        height: f64,
        container: &Container,
        fps: F,
        options: PlotOptions,
    ) -> Result<Self, PlotError>
    where
        F: FnMut(f64) + 'static,
    {
        let viewport = Viewport::new(width, height)?;
        let id = Uuid::new_v4();

        let mut surface = Surface::new(viewport, container)?;
        let mut strategy = strategy::for_kind(kind);
        strategy.prepare(&mut surface);
        let (status, _) = watch::channel(Lifecycle::Initializing);
        let state = Rc::new(RefCell::new(PlotState {
            id,
            kind,
            lifecycle: Lifecycle::Initializing,
            status,
            destroy_requested: false,
            dataset,
            surface: Some(surface),
            strategy,
            zoom: ZoomBehavior::new(viewport, options.zoom),
            filter: options.visibility,
            base_x: options.base_x,
            base_y: options.base_y,
            ticker: Ticker::new(options.target_fps),
            frames: 0,
            last_fps: None,
            default_duration: Duration::from_millis(options.default_duration_ms),
        }));
        debug!("plot {id}: creating {kind} plot {width}x{height}");

        let chunk = if kind.chunked_setup() {
            Some(options.allocation_chunk.max(1))
        } else {
            let mut st = state.borrow_mut();
            let len = st.dataset.len();
            st.allocate(0..len);
            st.finish_setup();
            None
        };
        let task = task::spawn_local(run(Rc::clone(&state), chunk, fps));

        Ok(Self {
            id,
            kind,
            state,
            task,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.borrow().lifecycle
    }

    /// True once primitives are allocated and the plot is drawing.
    pub fn ready(&self) -> bool {
        self.lifecycle() == Lifecycle::Ready
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle() == Lifecycle::Destroyed
    }

    /// Animate the zoom factor to `factor` about the viewport centre.
    ///
    /// The returned future waits for setup, then completes once `duration`
    /// (default from [`PlotOptions`]) has elapsed. It does not borrow the
    /// plot; after `destroy` it completes immediately.
    pub fn scale_to(
        &self,
        factor: f64,
        duration: Option<Duration>,
    ) -> impl Future<Output = ()> + 'static {
        let state = Rc::clone(&self.state);
        let mut status = state.borrow().status.subscribe();
        async move {
            let settled = status
                .wait_for(|s| *s != Lifecycle::Initializing)
                .await
                .map(|s| *s);
            if !matches!(settled, Ok(Lifecycle::Ready)) {
                return;
            }
            let duration = {
                let mut st = state.borrow_mut();
                if st.lifecycle != Lifecycle::Ready {
                    return;
                }
                let duration = duration.unwrap_or(st.default_duration);
                if let Some(transform) = st.zoom.scale_to(factor, duration, Instant::now()) {
                    st.apply_transform(transform);
                }
                duration
            };
            time::sleep(duration).await;
        }
    }

    /// Zoom about the wheel position. Ignored until ready.
    pub fn wheel(&self, event: &WheelEvent) {
        let mut st = self.state.borrow_mut();
        if st.lifecycle != Lifecycle::Ready {
            return;
        }
        let transform = st.zoom.wheel(event);
        st.apply_transform(transform);
    }

    /// Drag to pan. Ignored until ready.
    pub fn pointer(&self, event: &PointerEvent) {
        let mut st = self.state.borrow_mut();
        if st.lifecycle != Lifecycle::Ready {
            return;
        }
        if let Some(transform) = st.zoom.pointer(event) {
            st.apply_transform(transform);
        }
    }

    /// Jump straight to `transform`, clamped like any gesture.
    pub fn set_transform(&self, transform: Transform) {
        let mut st = self.state.borrow_mut();
        if st.lifecycle != Lifecycle::Ready {
            return;
        }
        let transform = st.zoom.set_transform(transform);
        st.apply_transform(transform);
    }

    /// Current zoom transform.
    pub fn transform(&self) -> Transform {
        self.state.borrow().zoom.transform()
    }

    /// Indices of the points that passed culling on the last redraw.
    pub fn visible_indices(&self) -> Vec<usize> {
        let st = self.state.borrow();
        st.surface
            .as_ref()
            .map(|s| st.strategy.visible_indices(s))
            .unwrap_or_default()
    }

    /// Primitives currently held by the strategy; zero once destroyed.
    pub fn primitive_count(&self) -> usize {
        let st = self.state.borrow();
        st.surface
            .as_ref()
            .map_or(0, |s| st.strategy.primitive_count(s))
    }

    /// Counters for reports.
    pub fn frame_stats(&self) -> FrameStats {
        let st = self.state.borrow();
        let (visible, primitives) = match st.surface.as_ref() {
            Some(s) => (
                st.strategy.visible_indices(s).len(),
                st.strategy.primitive_count(s),
            ),
            None => (0, 0),
        };
        FrameStats {
            plot_id: st.id,
            kind: st.kind,
            lifecycle: st.lifecycle,
            frames: st.frames,
            last_fps: st.last_fps,
            visible,
            primitives,
            texture_bytes: st.strategy.texture_bytes(),
            transform: st.zoom.transform(),
        }
    }

    /// Inspect the last rendered frame. `None` once destroyed.
    pub fn with_framebuffer<R>(&self, f: impl FnOnce(&Framebuffer) -> R) -> Option<R> {
        let st = self.state.borrow();
        st.surface.as_ref().map(|s| f(s.framebuffer()))
    }

    /// Release the surface and every primitive. Safe to call repeatedly; if
    /// setup is still running the teardown happens when it finishes.
    pub fn destroy(&self) {
        let mut st = self.state.borrow_mut();
        match st.lifecycle {
            Lifecycle::Destroyed => {}
            Lifecycle::Initializing => {
                if !st.destroy_requested {
                    debug!("plot {}: destroy queued until setup finishes", st.id);
                }
                st.destroy_requested = true;
            }
            Lifecycle::Ready => {
                st.teardown();
                self.task.abort();
            }
        }
    }
}

impl fmt::Debug for ScatterPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatterPlot")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

impl Drop for ScatterPlot {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Finish any chunked setup, then render at the target rate until destroyed.
async fn run<F>(state: SharedState, chunk: Option<usize>, mut fps: F)
where
    F: FnMut(f64),
{
    if let Some(chunk) = chunk {
        if !setup_in_chunks(&state, chunk).await {
            return;
        }
    }

    let period = state.borrow().ticker.frame_interval();
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let sample = {
            let mut st = state.borrow_mut();
            if st.lifecycle == Lifecycle::Destroyed {
                break;
            }
            st.frame(Instant::now())
        };
        if let Some(sample) = sample {
            fps(sample);
        }
    }
}

/// Allocate `chunk` points at a time, yielding in between. Returns `false`
/// when a queued destroy ended setup early.
async fn setup_in_chunks(state: &SharedState, chunk: usize) -> bool {
    let len = state.borrow().dataset.len();
    let mut next = 0;
    while next < len {
        {
            let mut st = state.borrow_mut();
            if st.destroy_requested {
                break;
            }
            let end = (next + chunk).min(len);
            st.allocate(next..end);
            next = end;
        }
        task::yield_now().await;
    }

    let mut st = state.borrow_mut();
    if st.destroy_requested {
        st.teardown();
        return false;
    }
    st.finish_setup();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use scatterzoom_core::{Point, Rgb};

    fn options() -> PlotOptions {
        PlotOptions {
            allocation_chunk: 2,
            ..Default::default()
        }
    }

    fn dataset() -> Dataset {
        (0..5)
            .map(|i| Point::new(50.0 * i as f64, 40.0, 4.0, Rgb::new(200, 0, 0)))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(PlotKind::RedrawGraphics.to_string(), "redraw graphics");
        assert!(PlotKind::UniqueTexture.chunked_setup());
        assert!(!PlotKind::SharedTexture.chunked_setup());
    }

    #[test]
    fn test_options_from_partial_json() {
        let opts: PlotOptions = serde_json::from_str(r#"{"target_fps": 30.0}"#).unwrap();
        assert_eq!(opts.target_fps, 30.0);
        assert_eq!(opts.default_duration_ms, 1500);
        assert_eq!(opts.visibility.margin, 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_kinds_are_ready_immediately() {
        let local = task::LocalSet::new();
        local
            .run_until(async {
                let container = Container::new();
                let plot = ScatterPlot::new(
                    PlotKind::TranslateGraphics,
                    dataset(),
                    400.0,
                    300.0,
                    &container,
                    |_| {},
                    options(),
                )
                .unwrap();
                assert!(plot.ready());
                assert_eq!(plot.primitive_count(), 5);
                assert_eq!(plot.visible_indices(), vec![0, 1, 2, 3, 4]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_chunked_setup_and_frames() {
        let local = task::LocalSet::new();
        local
            .run_until(async {
                let container = Container::new();
                let samples = Rc::new(RefCell::new(Vec::new()));
                let sink = Rc::clone(&samples);
                let plot = ScatterPlot::new(
                    PlotKind::UniqueTexture,
                    dataset(),
                    400.0,
                    300.0,
                    &container,
                    move |fps| sink.borrow_mut().push(fps),
                    options(),
                )
                .unwrap();
                assert_eq!(plot.lifecycle(), Lifecycle::Initializing);
                assert!(container.mounted().is_some());

                time::sleep(Duration::from_millis(100)).await;
                assert!(plot.ready());
                assert_eq!(plot.primitive_count(), 5);
                assert!(!samples.borrow().is_empty());
                let stats = plot.frame_stats();
                assert_eq!(stats.plot_id, plot.id());
                assert!(stats.frames > 0);
                assert_eq!(
                    plot.with_framebuffer(|fb| fb.pixel(50, 40)),
                    Some(Some(Rgb::new(200, 0, 0)))
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_transform_skips_redraw() {
        let local = task::LocalSet::new();
        local
            .run_until(async {
                let container = Container::new();
                let plot = ScatterPlot::new(
                    PlotKind::SharedTexture,
                    dataset(),
                    400.0,
                    300.0,
                    &container,
                    |_| {},
                    options(),
                )
                .unwrap();
                let before = plot.visible_indices();
                plot.state
                    .borrow_mut()
                    .apply_transform(Transform::new(0.0, 0.0, 0.0));
                assert_eq!(plot.visible_indices(), before);
            })
            .await;
    }
}
