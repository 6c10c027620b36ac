//! # scatterzoom renderer
//!
//! A small software rendering engine and the scatter plots built on it.
//!
//! A [`ScatterPlot`] owns a [`Surface`] mounted in a host [`Container`], one
//! of four rendering strategies selected by [`PlotKind`], and a
//! [`ZoomBehavior`] that turns wheel/drag gestures and programmatic
//! `scale_to` calls into transforms. Frames are produced by a local tokio
//! task that reports one FPS sample per rendered frame.

pub mod axis;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod plot;
pub mod render_data;
mod strategy;
pub mod surface;
pub mod texture;
pub mod ticker;
pub mod zoom;

pub use axis::ZoomableAxis;
pub use error::PlotError;
pub use framebuffer::Framebuffer;
pub use plot::{Lifecycle, PlotKind, PlotOptions, ScatterPlot};
pub use render_data::FrameStats;
pub use surface::{Container, Surface, SurfaceId};
pub use zoom::{DeltaMode, PointerEvent, WheelEvent, WheelSensitivity, ZoomBehavior, ZoomConfig};
