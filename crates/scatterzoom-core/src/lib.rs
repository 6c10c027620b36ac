//! # scatterzoom core
//!
//! Data model and coordinate pipeline shared by every rendering strategy:
//! random point datasets, linear scales, the pan/zoom transform that is
//! composed onto them, and the viewport culling test.

pub mod dataset;
pub mod error;
pub mod geometry;
pub mod scale;
pub mod transform;
pub mod viewport;

pub use dataset::{generate, generate_with_rng, Dataset, DatasetBounds};
pub use error::CoreError;
pub use geometry::{Point, Rgb, ScreenPoint};
pub use scale::{Axis, LinearScale};
pub use transform::Transform;
pub use viewport::{Viewport, VisibilityFilter};
