use scatterzoom_core::CoreError;
use thiserror::Error;

/// Errors raised while constructing a plot or axis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("Invalid viewport {width}x{height}: both dimensions must be positive")]
    InvalidViewport { width: f64, height: f64 },

    #[error("Viewport {width}x{height} is too large to allocate")]
    ViewportTooLarge { width: f64, height: f64 },

    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for PlotError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidViewport { width, height } => {
                PlotError::InvalidViewport { width, height }
            }
            other => PlotError::Core(other),
        }
    }
}
