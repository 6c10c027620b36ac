use scatterzoom_renderer::PlotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Failed to install plot: {0}")]
    Plot(#[from] PlotError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
