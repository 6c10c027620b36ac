use thiserror::Error;

/// Errors raised while building viewports, scales and transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid viewport {width}x{height}: both dimensions must be positive")]
    InvalidViewport { width: f64, height: f64 },

    #[error("Invalid transform: scale {scale} must be finite and positive")]
    InvalidTransform { scale: f64 },

    #[error("Degenerate scale domain [{0}, {1}]")]
    DegenerateScale(f64, f64),
}
