use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scatterzoom_core::Transform;

use crate::plot::{Lifecycle, PlotKind};

/// Snapshot of a plot's rendering counters, serializable for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub plot_id: Uuid,
    pub kind: PlotKind,
    pub lifecycle: Lifecycle,
    /// Frames rendered since construction.
    pub frames: u64,
    /// Most recent instantaneous FPS sample, if a frame has been rendered.
    pub last_fps: Option<f64>,
    pub visible: usize,
    pub primitives: usize,
    pub texture_bytes: usize,
    pub transform: Transform,
}
