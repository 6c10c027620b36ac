use log::info;
use scatterzoom_bench::{run_benchmark, BenchConfig, BenchError};
use tokio::task::LocalSet;

fn main() -> Result<(), BenchError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BenchConfig::from_env()?;
    info!(
        "running {} plot kinds over sizes {:?} at {}x{}",
        config.kinds.len(),
        config.sizes,
        config.width,
        config.height
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let report = LocalSet::new().block_on(&runtime, run_benchmark(config))?;

    if let Some(worst) = report.worst() {
        info!("worst: {} with {} points", worst.kind, worst.points);
    }
    println!("{}", report.to_json()?);
    Ok(())
}
